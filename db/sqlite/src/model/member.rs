use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct MemberModel {
    id: Uuid,
    name: String,
    email: String,
    photo: String,
    is_visible: bool,
}

impl MemberModel {
    pub fn new(id: &Uuid, name: &str, email: &str, photo: &str, is_visible: &bool) -> Self {
        Self {
            id: *id,
            name: name.to_owned(),
            email: email.to_owned(),
            photo: photo.to_owned(),
            is_visible: *is_visible,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn photo(&self) -> &str {
        &self.photo
    }

    pub fn is_visible(&self) -> &bool {
        &self.is_visible
    }
}
