//! Built-in knowledge base used when no config file is supplied.

use std::collections::BTreeMap;

use crate::graph::{BodySystem, Connection, SystemGraph, SystemWeights};
use crate::table::ProbabilityTable;

use BodySystem::*;

const DISEASES: [&str; 13] = [
    "Common Cold",
    "Influenza",
    "COVID-19",
    "Allergic Rhinitis",
    "Sinusitis",
    "Bronchitis",
    "Pneumonia",
    "Asthma",
    "GERD",
    "Migraine",
    "Tension Headache",
    "UTI",
    "Gastroenteritis",
];

/// Priors in `DISEASES` order.
const PRIORS: [f64; 13] = [
    0.20, 0.10, 0.05, 0.15, 0.08, 0.07, 0.03, 0.06, 0.08, 0.09, 0.12, 0.04, 0.10,
];

/// `P(symptom | disease)`, columns in `DISEASES` order.
const LIKELIHOODS: [(&str, [f64; 13]); 28] = [
    (
        "Fever",
        [
            0.40, 0.90, 0.80, 0.05, 0.30, 0.40, 0.85,
            0.10, 0.01, 0.15, 0.05, 0.40, 0.50,
        ],
    ),
    (
        "Cough",
        [
            0.80, 0.80, 0.80, 0.30, 0.40, 0.90, 0.90,
            0.70, 0.40, 0.05, 0.05, 0.01, 0.10,
        ],
    ),
    (
        "Shortness of Breath",
        [
            0.10, 0.20, 0.60, 0.20, 0.05, 0.70, 0.90,
            0.95, 0.20, 0.05, 0.05, 0.01, 0.05,
        ],
    ),
    (
        "Fatigue",
        [
            0.70, 0.90, 0.85, 0.40, 0.60, 0.70, 0.90,
            0.50, 0.30, 0.80, 0.70, 0.60, 0.80,
        ],
    ),
    (
        "Headache",
        [
            0.60, 0.80, 0.70, 0.60, 0.85, 0.30, 0.40,
            0.20, 0.20, 0.95, 0.95, 0.30, 0.50,
        ],
    ),
    (
        "Sore Throat",
        [
            0.80, 0.60, 0.60, 0.30, 0.40, 0.50, 0.30,
            0.10, 0.60, 0.05, 0.05, 0.01, 0.10,
        ],
    ),
    (
        "Runny Nose",
        [
            0.90, 0.60, 0.50, 0.95, 0.80, 0.30, 0.10,
            0.20, 0.01, 0.10, 0.05, 0.01, 0.05,
        ],
    ),
    (
        "Nasal Congestion",
        [
            0.90, 0.60, 0.50, 0.90, 0.90, 0.20, 0.10,
            0.20, 0.01, 0.20, 0.10, 0.01, 0.05,
        ],
    ),
    (
        "Sneezing",
        [
            0.80, 0.40, 0.30, 0.95, 0.60, 0.20, 0.10,
            0.30, 0.01, 0.10, 0.05, 0.01, 0.05,
        ],
    ),
    (
        "Chest Pain",
        [
            0.10, 0.20, 0.40, 0.05, 0.05, 0.60, 0.70,
            0.60, 0.70, 0.10, 0.05, 0.01, 0.10,
        ],
    ),
    (
        "Wheezing",
        [
            0.10, 0.10, 0.30, 0.30, 0.05, 0.70, 0.60,
            0.95, 0.10, 0.01, 0.01, 0.01, 0.01,
        ],
    ),
    (
        "Nausea",
        [
            0.20, 0.60, 0.50, 0.10, 0.30, 0.10, 0.30,
            0.10, 0.80, 0.70, 0.30, 0.30, 0.90,
        ],
    ),
    (
        "Vomiting",
        [
            0.10, 0.50, 0.30, 0.05, 0.20, 0.05, 0.20,
            0.05, 0.60, 0.60, 0.10, 0.20, 0.90,
        ],
    ),
    (
        "Diarrhea",
        [
            0.05, 0.30, 0.40, 0.01, 0.05, 0.05, 0.10,
            0.01, 0.30, 0.10, 0.05, 0.10, 0.95,
        ],
    ),
    (
        "Abdominal Pain",
        [
            0.05, 0.30, 0.20, 0.01, 0.05, 0.05, 0.10,
            0.01, 0.70, 0.20, 0.05, 0.40, 0.90,
        ],
    ),
    (
        "Muscle Aches",
        [
            0.50, 0.90, 0.70, 0.10, 0.30, 0.40, 0.60,
            0.10, 0.05, 0.40, 0.60, 0.30, 0.40,
        ],
    ),
    (
        "Joint Pain",
        [
            0.30, 0.80, 0.60, 0.05, 0.20, 0.20, 0.30,
            0.05, 0.05, 0.20, 0.30, 0.20, 0.20,
        ],
    ),
    (
        "Chills",
        [
            0.40, 0.90, 0.80, 0.05, 0.30, 0.40, 0.80,
            0.10, 0.01, 0.20, 0.10, 0.40, 0.50,
        ],
    ),
    (
        "Loss of Taste/Smell",
        [
            0.30, 0.20, 0.80, 0.40, 0.60, 0.05, 0.10,
            0.01, 0.10, 0.20, 0.05, 0.01, 0.05,
        ],
    ),
    (
        "Itchy Eyes",
        [
            0.30, 0.10, 0.10, 0.90, 0.40, 0.05, 0.05,
            0.20, 0.01, 0.30, 0.10, 0.01, 0.01,
        ],
    ),
    (
        "Ear Pain",
        [
            0.40, 0.20, 0.10, 0.20, 0.60, 0.05, 0.05,
            0.01, 0.05, 0.30, 0.20, 0.01, 0.01,
        ],
    ),
    (
        "Frequent Urination",
        [
            0.05, 0.05, 0.05, 0.01, 0.01, 0.01, 0.05,
            0.01, 0.05, 0.01, 0.01, 0.95, 0.10,
        ],
    ),
    (
        "Painful Urination",
        [
            0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01,
            0.01, 0.01, 0.01, 0.01, 0.95, 0.05,
        ],
    ),
    (
        "Blood in Urine",
        [
            0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01,
            0.01, 0.01, 0.01, 0.01, 0.40, 0.05,
        ],
    ),
    (
        "Heartburn",
        [
            0.05, 0.05, 0.10, 0.01, 0.05, 0.05, 0.05,
            0.05, 0.95, 0.10, 0.05, 0.01, 0.20,
        ],
    ),
    (
        "Regurgitation",
        [
            0.05, 0.10, 0.05, 0.01, 0.05, 0.05, 0.05,
            0.05, 0.90, 0.10, 0.05, 0.01, 0.60,
        ],
    ),
    (
        "Light Sensitivity",
        [
            0.10, 0.30, 0.20, 0.30, 0.40, 0.05, 0.10,
            0.05, 0.05, 0.90, 0.60, 0.05, 0.10,
        ],
    ),
    (
        "Sound Sensitivity",
        [
            0.10, 0.20, 0.10, 0.10, 0.30, 0.05, 0.05,
            0.05, 0.05, 0.85, 0.50, 0.05, 0.05,
        ],
    ),
];

const CONNECTIONS: [(BodySystem, BodySystem, f64); 35] = [
    (Neurological, Endocrine, 0.8),
    (Neurological, Immune, 0.7),
    (Neurological, Digestive, 0.7),
    (Neurological, MentalHealth, 0.9),
    (Neurological, Cardiovascular, 0.6),
    (Neurological, Respiratory, 0.6),
    (Neurological, Musculoskeletal, 0.5),
    (Endocrine, Immune, 0.7),
    (Endocrine, Digestive, 0.6),
    (Endocrine, Metabolic, 0.9),
    (Endocrine, Cardiovascular, 0.7),
    (Endocrine, Reproductive, 0.8),
    (Endocrine, MentalHealth, 0.7),
    (Immune, Digestive, 0.8),
    (Immune, Respiratory, 0.7),
    (Immune, Integumentary, 0.7),
    (Immune, MentalHealth, 0.6),
    (Immune, Metabolic, 0.6),
    (Digestive, Metabolic, 0.8),
    (Digestive, Immune, 0.8),
    (Digestive, MentalHealth, 0.7),
    (Cardiovascular, Respiratory, 0.8),
    (Cardiovascular, Metabolic, 0.7),
    (Cardiovascular, Urinary, 0.6),
    (Respiratory, Cardiovascular, 0.8),
    (Respiratory, Immune, 0.7),
    (Musculoskeletal, Metabolic, 0.6),
    (Musculoskeletal, Cardiovascular, 0.6),
    (Metabolic, Endocrine, 0.9),
    (Metabolic, Immune, 0.6),
    (Metabolic, Cardiovascular, 0.7),
    (MentalHealth, Neurological, 0.9),
    (MentalHealth, Endocrine, 0.7),
    (MentalHealth, Immune, 0.6),
    (MentalHealth, Digestive, 0.7),
];

/// Symptom → system association strengths.
const SYMPTOM_SYSTEMS: [(&str, &[(BodySystem, f64)]); 33] = [
    (
        "Headache",
        &[
            (Neurological, 0.9),
            (Cardiovascular, 0.6),
            (Endocrine, 0.5),
            (Immune, 0.4),
            (Digestive, 0.3),
        ],
    ),
    (
        "Dizziness",
        &[
            (Neurological, 0.8),
            (Cardiovascular, 0.7),
            (Endocrine, 0.4),
            (Respiratory, 0.3),
        ],
    ),
    (
        "Fatigue",
        &[
            (Neurological, 0.6),
            (Endocrine, 0.7),
            (Immune, 0.7),
            (Metabolic, 0.8),
            (MentalHealth, 0.6),
            (Cardiovascular, 0.5),
        ],
    ),
    (
        "Memory Problems",
        &[
            (Neurological, 0.9),
            (Endocrine, 0.5),
            (Cardiovascular, 0.4),
            (MentalHealth, 0.6),
        ],
    ),
    (
        "Numbness/Tingling",
        &[
            (Neurological, 0.9),
            (Cardiovascular, 0.4),
            (Endocrine, 0.5),
            (Immune, 0.3),
        ],
    ),
    ("Abdominal Pain", &[(Digestive, 0.9), (Reproductive, 0.5), (Urinary, 0.4), (Immune, 0.3)]),
    ("Nausea", &[(Digestive, 0.8), (Neurological, 0.5), (Endocrine, 0.4), (MentalHealth, 0.3)]),
    ("Diarrhea", &[(Digestive, 0.9), (Immune, 0.6), (Endocrine, 0.3)]),
    ("Constipation", &[(Digestive, 0.9), (Neurological, 0.4), (Metabolic, 0.4), (Endocrine, 0.3)]),
    ("Bloating", &[(Digestive, 0.9), (Immune, 0.5), (Endocrine, 0.3), (Metabolic, 0.3)]),
    ("Acid Reflux", &[(Digestive, 0.9), (Respiratory, 0.4), (Cardiovascular, 0.3)]),
    (
        "Chest Pain",
        &[
            (Cardiovascular, 0.9),
            (Respiratory, 0.7),
            (Digestive, 0.4),
            (Musculoskeletal, 0.4),
            (MentalHealth, 0.3),
        ],
    ),
    (
        "Palpitations",
        &[
            (Cardiovascular, 0.9),
            (Endocrine, 0.6),
            (MentalHealth, 0.5),
            (Neurological, 0.3),
        ],
    ),
    (
        "Shortness of Breath",
        &[
            (Respiratory, 0.9),
            (Cardiovascular, 0.8),
            (Immune, 0.4),
            (MentalHealth, 0.4),
        ],
    ),
    ("Edema", &[(Cardiovascular, 0.8), (Urinary, 0.6), (Endocrine, 0.4), (Immune, 0.3)]),
    ("Fever", &[(Immune, 0.9), (Respiratory, 0.6), (Digestive, 0.5), (Urinary, 0.4)]),
    ("Joint Pain", &[(Musculoskeletal, 0.9), (Immune, 0.7), (Endocrine, 0.4)]),
    ("Rash", &[(Integumentary, 0.9), (Immune, 0.8), (Digestive, 0.3), (Endocrine, 0.3)]),
    (
        "Recurrent Infections",
        &[
            (Immune, 0.9),
            (Respiratory, 0.6),
            (Urinary, 0.5),
            (Integumentary, 0.4),
        ],
    ),
    (
        "Weight Changes",
        &[
            (Endocrine, 0.8),
            (Metabolic, 0.8),
            (Digestive, 0.5),
            (MentalHealth, 0.4),
        ],
    ),
    ("Heat/Cold Intolerance", &[(Endocrine, 0.9), (Metabolic, 0.7), (Cardiovascular, 0.4)]),
    ("Excessive Thirst", &[(Endocrine, 0.8), (Metabolic, 0.7), (Urinary, 0.6)]),
    ("Hair Loss", &[(Endocrine, 0.7), (Integumentary, 0.8), (Immune, 0.5), (Metabolic, 0.4)]),
    (
        "Anxiety",
        &[
            (MentalHealth, 0.9),
            (Neurological, 0.7),
            (Endocrine, 0.6),
            (Cardiovascular, 0.5),
            (Digestive, 0.4),
        ],
    ),
    (
        "Depression",
        &[
            (MentalHealth, 0.9),
            (Neurological, 0.7),
            (Endocrine, 0.6),
            (Immune, 0.5),
            (Metabolic, 0.4),
        ],
    ),
    ("Insomnia", &[(MentalHealth, 0.8), (Neurological, 0.7), (Endocrine, 0.6), (Metabolic, 0.4)]),
    (
        "Irritability",
        &[
            (MentalHealth, 0.8),
            (Neurological, 0.6),
            (Endocrine, 0.7),
            (Digestive, 0.4),
        ],
    ),
    ("Cough", &[(Respiratory, 0.9), (Immune, 0.7), (Digestive, 0.3)]),
    ("Wheezing", &[(Respiratory, 0.9), (Immune, 0.7), (Cardiovascular, 0.3)]),
    ("Frequent Urination", &[(Urinary, 0.9), (Endocrine, 0.7), (Reproductive, 0.4)]),
    ("Urinary Pain", &[(Urinary, 0.9), (Immune, 0.6), (Reproductive, 0.4)]),
    (
        "Back Pain",
        &[
            (Musculoskeletal, 0.9),
            (Neurological, 0.6),
            (Urinary, 0.3),
            (Reproductive, 0.3),
        ],
    ),
    (
        "Muscle Weakness",
        &[
            (Musculoskeletal, 0.8),
            (Neurological, 0.7),
            (Endocrine, 0.6),
            (Metabolic, 0.5),
        ],
    ),
];

/// Lifestyle factor → system impact strengths.
const LIFESTYLE_IMPACT: [(&str, &[(BodySystem, f64)]); 5] = [
    (
        "Diet",
        &[
            (Digestive, 0.9),
            (Immune, 0.8),
            (Metabolic, 0.9),
            (Cardiovascular, 0.8),
            (Endocrine, 0.7),
            (Neurological, 0.6),
            (MentalHealth, 0.6),
        ],
    ),
    (
        "Sleep",
        &[
            (Neurological, 0.9),
            (Endocrine, 0.8),
            (Immune, 0.7),
            (MentalHealth, 0.8),
            (Metabolic, 0.7),
            (Cardiovascular, 0.6),
        ],
    ),
    (
        "Exercise",
        &[
            (Musculoskeletal, 0.9),
            (Cardiovascular, 0.9),
            (Metabolic, 0.8),
            (Immune, 0.7),
            (MentalHealth, 0.8),
            (Endocrine, 0.7),
            (Respiratory, 0.7),
        ],
    ),
    (
        "Stress",
        &[
            (MentalHealth, 0.9),
            (Neurological, 0.8),
            (Endocrine, 0.8),
            (Immune, 0.7),
            (Digestive, 0.7),
            (Cardiovascular, 0.7),
            (Metabolic, 0.6),
        ],
    ),
    (
        "Environmental Toxins",
        &[
            (Immune, 0.8),
            (Respiratory, 0.8),
            (Integumentary, 0.7),
            (Endocrine, 0.7),
            (Neurological, 0.6),
            (Reproductive, 0.6),
        ],
    ),
];

/// Multi-system disease pattern → system involvement.
const PATTERNS: [(&str, &[(BodySystem, f64)]); 7] = [
    (
        "Metabolic Syndrome",
        &[
            (Metabolic, 0.9),
            (Cardiovascular, 0.8),
            (Endocrine, 0.8),
            (Immune, 0.6),
        ],
    ),
    (
        "Autoimmune Disorders",
        &[
            (Immune, 0.9),
            (Endocrine, 0.7),
            (Digestive, 0.7),
            (Musculoskeletal, 0.7),
            (Neurological, 0.6),
            (Integumentary, 0.6),
        ],
    ),
    (
        "Chronic Fatigue Syndrome",
        &[
            (Immune, 0.8),
            (Neurological, 0.8),
            (Endocrine, 0.7),
            (Metabolic, 0.7),
            (MentalHealth, 0.7),
        ],
    ),
    (
        "Fibromyalgia",
        &[
            (Neurological, 0.8),
            (Musculoskeletal, 0.8),
            (Immune, 0.7),
            (MentalHealth, 0.7),
            (Endocrine, 0.6),
        ],
    ),
    (
        "Irritable Bowel Syndrome",
        &[
            (Digestive, 0.9),
            (Neurological, 0.7),
            (Immune, 0.7),
            (MentalHealth, 0.7),
            (Endocrine, 0.5),
        ],
    ),
    (
        "Depression",
        &[
            (MentalHealth, 0.9),
            (Neurological, 0.8),
            (Endocrine, 0.7),
            (Immune, 0.6),
            (Digestive, 0.5),
        ],
    ),
    (
        "Chronic Inflammation",
        &[
            (Immune, 0.9),
            (Cardiovascular, 0.7),
            (Metabolic, 0.7),
            (Digestive, 0.7),
            (Musculoskeletal, 0.7),
            (Neurological, 0.6),
        ],
    ),
];

fn weights(entries: &[(BodySystem, f64)]) -> SystemWeights {
    entries.iter().copied().collect()
}

fn keyed(rows: &[(&str, &[(BodySystem, f64)])]) -> BTreeMap<String, SystemWeights> {
    rows.iter()
        .map(|(name, entries)| (name.to_string(), weights(entries)))
        .collect()
}

pub(crate) fn default_table() -> ProbabilityTable {
    let diseases: Vec<String> = DISEASES.iter().map(|d| d.to_string()).collect();
    let priors = diseases.iter().cloned().zip(PRIORS).collect();
    let symptom_given_disease = LIKELIHOODS
        .iter()
        .map(|(symptom, column)| {
            let row = diseases.iter().cloned().zip(column.iter().copied()).collect();
            (symptom.to_string(), row)
        })
        .collect();

    ProbabilityTable {
        schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
        description: Some("Built-in primary-care symptom table".to_string()),
        diseases,
        priors,
        symptom_given_disease,
    }
}

pub(crate) fn default_graph() -> SystemGraph {
    SystemGraph {
        schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
        description: Some("Built-in body-system association graph".to_string()),
        connections: CONNECTIONS
            .iter()
            .map(|&(from, to, strength)| Connection { from, to, strength })
            .collect(),
        symptom_systems: keyed(&SYMPTOM_SYSTEMS),
        lifestyle_impact: keyed(&LIFESTYLE_IMPACT),
        patterns: keyed(&PATTERNS),
    }
}
