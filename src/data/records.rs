//! Record Set
//!
//! In-memory patient records loaded from a JSON array, with the summary
//! and grouped analytics the data endpoints serve.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::{DataProducer, Resource};
use crate::error::{ApiError, Result};

/// Risk score at or above which a patient counts as high risk.
pub const HIGH_RISK_SCORE: f64 = 70.0;

/// Inclusive age bands used by the demographics breakdown.
const AGE_GROUPS: [(&str, u32, u32); 5] = [
    ("30-40", 30, 40),
    ("41-50", 41, 50),
    ("51-60", 51, 60),
    ("61-70", 61, 70),
    ("71-80", 71, 80),
];

// == Patient ==
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub diagnosis: String,
    pub admission_date: String,
    pub discharge_date: String,
    pub readmitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readmission_date: Option<String>,
    pub risk_score: f64,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub comorbidities: Vec<String>,
    pub department: String,
    pub insurance: String,
    pub length_of_stay: f64,
}

// == Summaries ==
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_patients: usize,
    pub readmitted_patients: usize,
    pub readmission_rate: f64,
    pub avg_length_of_stay: f64,
    pub high_risk_patients: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRate {
    pub name: String,
    pub count: usize,
    pub readmitted: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age_groups: Vec<GroupRate>,
    pub genders: Vec<GroupRate>,
    pub insurance: Vec<GroupRate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub risk_factors: Vec<GroupRate>,
    pub demographics: Demographics,
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Tallies (count, readmitted) under each label a patient yields.
fn tally<'a, F, I>(patients: &'a [Patient], labels: F) -> BTreeMap<String, (usize, usize)>
where
    F: Fn(&'a Patient) -> I,
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for patient in patients {
        for label in labels(patient) {
            let slot = counts.entry(label.to_string()).or_default();
            slot.0 += 1;
            if patient.readmitted {
                slot.1 += 1;
            }
        }
    }
    counts
}

fn into_rates(counts: BTreeMap<String, (usize, usize)>) -> Vec<GroupRate> {
    counts
        .into_iter()
        .map(|(name, (count, readmitted))| GroupRate {
            name,
            count,
            readmitted,
            rate: ratio(readmitted, count),
        })
        .collect()
}

// == Record Set ==
/// Patient records served through the cache.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    patients: Vec<Patient>,
}

impl RecordSet {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self { patients }
    }

    /// Reads a JSON array of patient records from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset {}", path.display()))?;
        let patients: Vec<Patient> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing dataset {}", path.display()))?;
        Ok(Self::new(patients))
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    // == Stats ==
    pub fn summary(&self) -> Summary {
        let total = self.patients.len();
        let readmitted = self.patients.iter().filter(|p| p.readmitted).count();
        let stay: f64 = self.patients.iter().map(|p| p.length_of_stay).sum();

        Summary {
            total_patients: total,
            readmitted_patients: readmitted,
            readmission_rate: ratio(readmitted, total),
            avg_length_of_stay: if total == 0 { 0.0 } else { stay / total as f64 },
            high_risk_patients: self
                .patients
                .iter()
                .filter(|p| p.risk_score >= HIGH_RISK_SCORE)
                .count(),
        }
    }

    // == Page ==
    /// Records of the 1-based `page`; empty past the end.
    pub fn page(&self, page: usize, limit: usize) -> &[Patient] {
        let start = page.saturating_sub(1).saturating_mul(limit);
        if start >= self.patients.len() {
            return &[];
        }
        let end = start.saturating_add(limit).min(self.patients.len());
        &self.patients[start..end]
    }

    pub fn find(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    // == Analytics ==
    pub fn analytics(&self) -> Analytics {
        let mut risk_factors =
            into_rates(tally(&self.patients, |p| p.risk_factors.iter().map(String::as_str)));
        risk_factors.sort_by(|a, b| b.rate.total_cmp(&a.rate));

        let age_groups = AGE_GROUPS
            .iter()
            .map(|&(name, min, max)| {
                let members = self.patients.iter().filter(|p| (min..=max).contains(&p.age));
                let (count, readmitted) = members.fold((0, 0), |(c, r), p| {
                    (c + 1, r + usize::from(p.readmitted))
                });
                GroupRate {
                    name: name.to_string(),
                    count,
                    readmitted,
                    rate: ratio(readmitted, count),
                }
            })
            .collect();

        Analytics {
            risk_factors,
            demographics: Demographics {
                age_groups,
                genders: into_rates(tally(&self.patients, |p| [p.gender.as_str()])),
                insurance: into_rates(tally(&self.patients, |p| [p.insurance.as_str()])),
            },
        }
    }
}

impl DataProducer for RecordSet {
    fn produce(&self, resource: &Resource) -> Result<Value> {
        let value = match resource {
            Resource::Stats => serde_json::to_value(self.summary())?,
            Resource::PatientsPage { page, limit } => serde_json::to_value(self.page(*page, *limit))?,
            Resource::Patient { id } => {
                let patient = self
                    .find(id)
                    .ok_or_else(|| ApiError::NotFound(format!("Patient not found: {}", id)))?;
                serde_json::to_value(patient)?
            }
            Resource::Analytics => serde_json::to_value(self.analytics())?,
        };
        Ok(value)
    }

    fn total_records(&self) -> usize {
        self.patients.len()
    }
}
