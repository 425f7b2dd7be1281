//! Turning a suggested symptom into a question for the patient.

/// Question when no Bayesian follow-up is available.
pub const DEFAULT_DIAGNOSTIC_QUESTION: &str = "Could you tell me more about your symptoms?";

/// Question when no systems follow-up is available.
pub const DEFAULT_SYSTEMS_QUESTION: &str =
    "Could you tell me more about how your symptoms affect your daily life?";

const DIAGNOSTIC_TEMPLATES: &[(&str, &str)] = &[
    ("Fever", "Have you been experiencing any fever?"),
    ("Cough", "Do you have a cough?"),
    ("Shortness of Breath", "Have you noticed any difficulty breathing or shortness of breath?"),
    ("Fatigue", "Have you been feeling unusually tired or fatigued?"),
    ("Headache", "Have you been having headaches?"),
    ("Sore Throat", "Do you have a sore throat?"),
    ("Runny Nose", "Do you have a runny nose?"),
    ("Nasal Congestion", "Are you experiencing nasal congestion or a stuffy nose?"),
    ("Sneezing", "Have you been sneezing more than usual?"),
    ("Chest Pain", "Have you experienced any chest pain or discomfort?"),
    ("Wheezing", "Have you noticed any wheezing or whistling sound when breathing?"),
    ("Nausea", "Have you felt nauseous?"),
    ("Vomiting", "Have you had any vomiting?"),
    ("Diarrhea", "Have you experienced diarrhea?"),
    ("Abdominal Pain", "Have you had any abdominal pain or discomfort?"),
    ("Muscle Aches", "Are you experiencing any muscle aches or pains?"),
    ("Joint Pain", "Do you have any joint pain?"),
    ("Chills", "Have you had chills or felt unusually cold?"),
    ("Loss of Taste/Smell", "Have you noticed any changes in your sense of taste or smell?"),
    ("Itchy Eyes", "Are your eyes itchy?"),
    ("Ear Pain", "Have you experienced any ear pain?"),
    ("Frequent Urination", "Have you been urinating more frequently than usual?"),
    ("Painful Urination", "Do you experience pain or burning when urinating?"),
    ("Blood in Urine", "Have you noticed any blood in your urine?"),
    ("Heartburn", "Do you experience heartburn or a burning sensation in your chest?"),
    ("Regurgitation", "Have you experienced regurgitation or food coming back up after eating?"),
    ("Light Sensitivity", "Are you sensitive to light?"),
    ("Sound Sensitivity", "Are you sensitive to sound?"),
];

const SYSTEMS_TEMPLATES: &[(&str, &str)] = &[
    (
        "Headache",
        "Have you been experiencing headaches? If so, could you describe their location, \
         intensity, and any triggers you've noticed?",
    ),
    (
        "Fatigue",
        "How is your energy level throughout the day? Do you experience unusual fatigue or \
         exhaustion?",
    ),
    (
        "Digestive Issues",
        "Have you noticed any changes in your digestion, such as bloating, discomfort, or \
         changes in bowel habits?",
    ),
    (
        "Sleep Problems",
        "How has your sleep been? Do you have trouble falling asleep, staying asleep, or do \
         you wake up feeling unrefreshed?",
    ),
    (
        "Mood Changes",
        "Have you noticed any changes in your mood, such as feeling more anxious, irritable, \
         or down than usual?",
    ),
    (
        "Pain",
        "Are you experiencing any pain or discomfort in your body? If so, where is it located \
         and how would you describe it?",
    ),
    (
        "Skin Issues",
        "Have you noticed any changes in your skin, such as rashes, dryness, or unusual \
         sensations?",
    ),
    (
        "Cognitive Function",
        "Have you experienced any changes in your thinking, memory, or concentration?",
    ),
    (
        "Appetite Changes",
        "How has your appetite been? Have you noticed any changes in your hunger levels or \
         food preferences?",
    ),
    (
        "Weight Changes",
        "Have you experienced any unintentional weight changes recently?",
    ),
];

fn lookup(templates: &[(&str, &'static str)], symptom: &str) -> Option<&'static str> {
    templates
        .iter()
        .find(|(name, _)| *name == symptom)
        .map(|(_, q)| *q)
}

/// Phrase a Bayesian follow-up symptom as a yes/no question.
pub fn diagnostic_question(symptom: Option<&str>) -> String {
    match symptom {
        None => DEFAULT_DIAGNOSTIC_QUESTION.to_string(),
        Some(s) => lookup(DIAGNOSTIC_TEMPLATES, s)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Do you have {}?", s.to_lowercase())),
    }
}

/// Phrase a systems follow-up symptom as an open question.
pub fn systems_question(symptom: Option<&str>) -> String {
    match symptom {
        None => DEFAULT_SYSTEMS_QUESTION.to_string(),
        Some(s) => lookup(SYSTEMS_TEMPLATES, s)
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "Have you been experiencing {}? If so, could you tell me more about it?",
                    s.to_lowercase()
                )
            }),
    }
}
