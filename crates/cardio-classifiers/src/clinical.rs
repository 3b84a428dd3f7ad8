//! Rule-based annotations shown next to a model prediction, and the named
//! example patients used for demonstrations.
//!
//! None of this feeds the model; it only describes the input record.

use std::fmt;

use serde::Serialize;

use crate::record::PatientRecord;

/// Number of rules checked by [`risk_factors`].
pub const RISK_FACTOR_RULES: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "factor", content = "value", rename_all = "snake_case")]
pub enum RiskFactor {
    AdvancedAge(u32),
    MaleSex,
    AsymptomaticChestPain,
    HighBloodPressure(f64),
    HighCholesterol(f64),
    Diabetes,
    LowMaxHeartRate(f64),
    ExerciseAngina,
    SignificantStDepression(f64),
    BlockedVessels(u8),
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFactor::AdvancedAge(age) => write!(f, "Advanced age ({})", age),
            RiskFactor::MaleSex => write!(f, "Male gender"),
            RiskFactor::AsymptomaticChestPain => write!(f, "Asymptomatic chest pain"),
            RiskFactor::HighBloodPressure(bp) => write!(f, "High blood pressure ({})", bp),
            RiskFactor::HighCholesterol(chol) => write!(f, "High cholesterol ({})", chol),
            RiskFactor::Diabetes => write!(f, "Diabetes"),
            RiskFactor::LowMaxHeartRate(hr) => write!(f, "Low max heart rate ({})", hr),
            RiskFactor::ExerciseAngina => write!(f, "Exercise-induced angina"),
            RiskFactor::SignificantStDepression(st) => {
                write!(f, "Significant ST depression ({})", st)
            }
            RiskFactor::BlockedVessels(n) => write!(f, "{} blocked major vessels", n),
        }
    }
}

/// Triggered factors, in rule order.
pub fn risk_factors(r: &PatientRecord) -> Vec<RiskFactor> {
    let mut factors = Vec::new();
    if r.age > 55 {
        factors.push(RiskFactor::AdvancedAge(r.age));
    }
    if r.sex == 1 {
        factors.push(RiskFactor::MaleSex);
    }
    if r.cp == 3 {
        factors.push(RiskFactor::AsymptomaticChestPain);
    }
    if r.trestbps > 140.0 {
        factors.push(RiskFactor::HighBloodPressure(r.trestbps));
    }
    if r.chol > 240.0 {
        factors.push(RiskFactor::HighCholesterol(r.chol));
    }
    if r.fbs == 1 {
        factors.push(RiskFactor::Diabetes);
    }
    if r.thalach < 120.0 {
        factors.push(RiskFactor::LowMaxHeartRate(r.thalach));
    }
    if r.exang == 1 {
        factors.push(RiskFactor::ExerciseAngina);
    }
    if r.oldpeak > 2.0 {
        factors.push(RiskFactor::SignificantStDepression(r.oldpeak));
    }
    if r.ca > 0 {
        factors.push(RiskFactor::BlockedVessels(r.ca));
    }
    factors
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Status {
    Normal,
    HighRisk,
    Abnormal,
    High,
    Low,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Normal => "Normal",
            Status::HighRisk => "High Risk",
            Status::Abnormal => "Abnormal",
            Status::High => "High",
            Status::Low => "Low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileRow {
    pub attribute: &'static str,
    pub value: String,
    pub status: Status,
}

/// Status of the headline vitals.
pub fn profile_summary(r: &PatientRecord) -> Vec<ProfileRow> {
    vec![
        ProfileRow {
            attribute: "Age",
            value: format!("{} years", r.age),
            status: if (20..=65).contains(&r.age) {
                Status::Normal
            } else {
                Status::HighRisk
            },
        },
        ProfileRow {
            attribute: "Resting BP",
            value: format!("{} mmHg", r.trestbps),
            status: if (90.0..=140.0).contains(&r.trestbps) {
                Status::Normal
            } else {
                Status::Abnormal
            },
        },
        ProfileRow {
            attribute: "Cholesterol",
            value: format!("{} mg/dl", r.chol),
            status: if r.chol <= 200.0 {
                Status::Normal
            } else {
                Status::High
            },
        },
        ProfileRow {
            attribute: "Max Heart Rate",
            value: format!("{} bpm", r.thalach),
            status: if r.thalach >= 150.0 {
                Status::Normal
            } else {
                Status::Low
            },
        },
    ]
}

/// A named demonstration patient.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExampleProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub record: PatientRecord,
}

#[allow(clippy::too_many_arguments)]
fn record(
    age: u32,
    sex: u8,
    cp: u8,
    trestbps: f64,
    chol: f64,
    fbs: u8,
    restecg: u8,
    thalach: f64,
    exang: u8,
    oldpeak: f64,
    slope: u8,
    ca: u8,
    thal: u8,
) -> PatientRecord {
    PatientRecord {
        age,
        sex,
        cp,
        trestbps,
        chol,
        fbs,
        restecg,
        thalach,
        exang,
        oldpeak,
        slope,
        ca,
        thal,
    }
}

/// Low, medium and high risk reference patients, then the extreme cases.
/// Thalassemia values use the ordinal encoding.
pub fn example_profiles() -> Vec<ExampleProfile> {
    vec![
        ExampleProfile {
            name: "Low Risk Patient",
            description: "35-year-old female, normal vitals",
            record: record(35, 0, 0, 120.0, 200.0, 0, 0, 180.0, 0, 0.0, 1, 0, 1),
        },
        ExampleProfile {
            name: "High Risk Patient",
            description: "65-year-old male, multiple risk factors",
            record: record(65, 1, 3, 160.0, 300.0, 1, 1, 120.0, 1, 2.5, 2, 2, 2),
        },
        ExampleProfile {
            name: "Medium Risk Patient",
            description: "50-year-old male, moderate risk factors",
            record: record(50, 1, 1, 140.0, 250.0, 0, 0, 150.0, 0, 1.0, 1, 1, 1),
        },
        ExampleProfile {
            name: "Severe Coronary Disease",
            description: "67-year-old male, three blocked vessels, downsloping ST segment",
            record: record(67, 1, 3, 180.0, 350.0, 1, 2, 110.0, 1, 3.5, 2, 3, 2),
        },
        ExampleProfile {
            name: "Extreme Risk Factors",
            description: "75-year-old male, maximum risk factors across all parameters",
            record: record(75, 1, 3, 220.0, 450.0, 1, 2, 80.0, 1, 5.0, 2, 3, 2),
        },
    ]
}
