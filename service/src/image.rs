use ahash::HashSet;
use futures::future;
use itertools::Itertools;
use sd_error::{Error, Result};
use sd_storage::{ObjectStore, UploadFile};

use crate::retry::{retry, OnExhaustion, RetryPolicy};

/// Outcome of diffing a submitted image list against the stored one.
#[derive(PartialEq, Debug)]
pub struct ImagePlan {
    retained: Vec<String>,
    removed: Vec<String>,
}

impl ImagePlan {
    /// With no submitted list every stored image is kept.
    pub fn new(stored: &[String], submitted: Option<&[String]>) -> Result<Self> {
        let submitted = match submitted {
            Some(submitted) => submitted,
            None => {
                return Ok(Self {
                    retained: stored.to_vec(),
                    removed: Vec::new(),
                })
            }
        };

        let known: HashSet<&str> = stored.iter().map(String::as_str).collect();
        if let Some(unknown) = submitted.iter().find(|url| !known.contains(url.as_str())) {
            return Err(Error::Validation(format!(
                "payload references unknown image: {unknown}"
            )));
        }

        let retained: Vec<String> = submitted.iter().unique().cloned().collect();
        let kept: HashSet<&str> = retained.iter().map(String::as_str).collect();
        let removed = stored
            .iter()
            .filter(|url| !kept.contains(url.as_str()))
            .unique()
            .cloned()
            .collect();

        Ok(Self { retained, removed })
    }

    pub fn retained(&self) -> &Vec<String> {
        &self.retained
    }

    pub fn removed(&self) -> &Vec<String> {
        &self.removed
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct FailedUpload {
    file_name: String,
    reason: String,
}

impl FailedUpload {
    pub fn new(file_name: &str, reason: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            reason: reason.to_owned(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// URLs of the files that made it to the store, in submission order, and
/// the ones that did not.
#[derive(Default, Debug)]
pub struct UploadOutcome {
    uploaded: Vec<String>,
    failed: Vec<FailedUpload>,
}

impl UploadOutcome {
    pub fn uploaded(&self) -> &Vec<String> {
        &self.uploaded
    }

    pub fn failed(&self) -> &Vec<FailedUpload> {
        &self.failed
    }
}

pub async fn upload_all(
    store: &dyn ObjectStore,
    bucket: &str,
    policy: &RetryPolicy,
    files: &[UploadFile],
) -> UploadOutcome {
    let results = future::join_all(files.iter().map(|file| async move {
        let label = format!("Upload {}", file.name());
        let result = retry(&label, policy, OnExhaustion::Fail, || store.upload(file, bucket)).await;
        (file, result)
    }))
    .await;

    let mut outcome = UploadOutcome::default();
    for (file, result) in results {
        match result {
            Ok(Some(object)) => outcome.uploaded.push(object.url().to_owned()),
            Ok(None) => outcome
                .failed
                .push(FailedUpload::new(file.name(), "Upload produced no object")),
            Err(err) => outcome
                .failed
                .push(FailedUpload::new(file.name(), &err.to_string())),
        }
    }
    outcome
}

/// Best-effort removal. Returns how many URLs were actually deleted.
pub async fn delete_all(store: &dyn ObjectStore, policy: &RetryPolicy, urls: &[String]) -> usize {
    let results = future::join_all(urls.iter().map(|url| async move {
        let label = format!("Delete {url}");
        retry(&label, policy, OnExhaustion::SwallowAndLog, || store.delete(url)).await
    }))
    .await;

    results
        .into_iter()
        .filter(|result| matches!(result, Ok(Some(()))))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn missing_list_keeps_everything() {
        let stored = urls(&["a", "b"]);
        let plan = ImagePlan::new(&stored, None).unwrap();
        assert_eq!(plan.retained(), &stored);
        assert!(plan.removed().is_empty());
    }

    #[test]
    fn dropped_urls_are_scheduled_for_deletion() {
        let stored = urls(&["a", "b", "c"]);
        let submitted = urls(&["b", "a"]);
        let plan = ImagePlan::new(&stored, Some(submitted.as_slice())).unwrap();
        assert_eq!(plan.retained(), &urls(&["b", "a"]));
        assert_eq!(plan.removed(), &urls(&["c"]));
    }

    #[test]
    fn unknown_url_is_rejected_by_name() {
        let stored = urls(&["a", "b"]);
        let submitted = urls(&["a", "x"]);
        let err = ImagePlan::new(&stored, Some(submitted.as_slice())).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "payload references unknown image: x");
    }

    #[test]
    fn duplicates_collapse_to_first_position() {
        let stored = urls(&["a", "b"]);
        let submitted = urls(&["b", "a", "b"]);
        let plan = ImagePlan::new(&stored, Some(submitted.as_slice())).unwrap();
        assert_eq!(plan.retained(), &urls(&["b", "a"]));
        assert!(plan.removed().is_empty());
    }

    #[test]
    fn empty_list_removes_everything() {
        let stored = urls(&["a", "b"]);
        let plan = ImagePlan::new(&stored, Some(&[][..])).unwrap();
        assert!(plan.retained().is_empty());
        assert_eq!(plan.removed(), &stored);
    }
}
