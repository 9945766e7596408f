//! Bounded story history.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::story::StoryParams;

pub const HISTORY_CAPACITY: usize = 5;

/// A generated story and the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRecord {
    pub params: StoryParams,
    pub image_captions: Vec<String>,
    pub story: String,
    pub pdf: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

impl StoryRecord {
    pub fn new(params: StoryParams, image_captions: Vec<String>, story: String) -> Self {
        Self {
            params,
            image_captions,
            story,
            pdf: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_pdf(mut self, pdf: Vec<u8>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    pub fn has_pdf(&self) -> bool {
        self.pdf.is_some()
    }
}

/// FIFO by creation: appends at the tail, evicts from the head once more
/// than [`HISTORY_CAPACITY`] records are held. Reads never reorder.
#[derive(Debug, Default)]
pub struct StoryHistory {
    records: VecDeque<StoryRecord>,
}

impl StoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: StoryRecord) {
        self.records.push_back(record);
        while self.records.len() > HISTORY_CAPACITY {
            self.records.pop_front();
        }
    }

    /// Oldest first.
    pub fn list_all(&self) -> impl ExactSizeIterator<Item = &StoryRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&StoryRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::{StoryForm, StoryParams};

    fn record(story: &str) -> StoryRecord {
        let params = StoryParams::from_form(StoryForm::default(), &[]).unwrap();
        StoryRecord::new(params, vec![], story.to_string())
    }

    fn stories(history: &StoryHistory) -> Vec<&str> {
        history.list_all().map(|r| r.story.as_str()).collect()
    }

    #[test]
    fn five_records_all_kept() {
        let mut history = StoryHistory::new();
        for i in 1..=5 {
            history.append(record(&format!("S{i}")));
        }
        assert_eq!(stories(&history), vec!["S1", "S2", "S3", "S4", "S5"]);
    }

    #[test]
    fn sixth_record_evicts_oldest() {
        let mut history = StoryHistory::new();
        for i in 1..=6 {
            history.append(record(&format!("S{i}")));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(stories(&history), vec!["S2", "S3", "S4", "S5", "S6"]);
    }

    #[test]
    fn reads_do_not_affect_eviction() {
        let mut history = StoryHistory::new();
        for i in 1..=5 {
            history.append(record(&format!("S{i}")));
        }
        assert_eq!(history.get(0).unwrap().story, "S1");
        history.append(record("S6"));
        assert_eq!(history.get(0).unwrap().story, "S2");
    }

    #[test]
    fn pdf_travels_with_its_record() {
        let mut history = StoryHistory::new();
        history.append(record("S1").with_pdf(b"%PDF-1".to_vec()));
        for i in 2..=5 {
            history.append(record(&format!("S{i}")));
        }
        assert!(history.get(0).unwrap().has_pdf());

        history.append(record("S6"));
        assert!(history.list_all().all(|r| !r.has_pdf()));
    }

    #[test]
    fn empty_history() {
        let history = StoryHistory::new();
        assert!(history.is_empty());
        assert!(history.get(0).is_none());
    }
}
