//! Summarize raw object detections into a [`DetectionSnapshot`].
//!
//! The webcam detector reports `(class, score)` pairs per frame. Thresholding
//! and class matching happen here so the manager only sees booleans and counts.

use serde::{Deserialize, Serialize};

use crate::types::DetectionSnapshot;

/// One detected object in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    pub score: f32,
}

impl Detection {
    pub fn new(class: impl Into<String>, score: f32) -> Self {
        Self {
            class: class.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerceptionPolicy {
    pub phone_classes: Vec<String>,
    pub person_classes: Vec<String>,
    pub min_phone_score: f32,
    pub min_person_score: f32,
}

impl Default for PerceptionPolicy {
    fn default() -> Self {
        Self {
            phone_classes: vec![
                "cell phone".to_string(),
                "mobile phone".to_string(),
                "phone".to_string(),
            ],
            person_classes: vec!["person".to_string()],
            min_phone_score: 0.5,
            min_person_score: 0.5,
        }
    }
}

impl PerceptionPolicy {
    pub fn summarize(
        &self,
        detections: &[Detection],
        now: u64,
        is_interview_started: bool,
    ) -> DetectionSnapshot {
        let phone_detected = detections
            .iter()
            .any(|d| d.score > self.min_phone_score && matches_class(&self.phone_classes, &d.class));
        let people_count = detections
            .iter()
            .filter(|d| {
                d.score > self.min_person_score && matches_class(&self.person_classes, &d.class)
            })
            .count();

        DetectionSnapshot {
            now,
            is_interview_started,
            phone_detected,
            people_count: u32::try_from(people_count).unwrap_or(u32::MAX),
        }
    }
}

fn matches_class(classes: &[String], class: &str) -> bool {
    classes.iter().any(|c| c.eq_ignore_ascii_case(class.trim()))
}
