//! Consumer search phrases used for batch reports.

use std::collections::HashSet;

/// Raw batch term list. May contain case variants and stray whitespace;
/// pass it through [`unique_trimmed`] before use.
pub const BATCH_TERMS: &[&str] = &[
    "abdominoplasty", "acne", "acupressure", "adhd", "alcohol abuse", "alopecia", "annual phy",
    "arthritis", "athletes foot", "blurred vision", "bone density", "bone marrow", "botox",
    "breast mri", "breast pump", "broken wrist", "bronchitis", "burns", "cancer screening",
    "cataract", "cbt", "cholesterol", "colposcopy", "cornea transplant", "cosmetic surgery",
    "cpap", "cranial", "cranial prosthesis", "cryotherapy", "dementia", "dental care",
    "dentofacial abnormalities", "dermatomyositis", "diabetes", "echocardiogram", "eczema",
    "elbow pain", "emergency room", "epilepsy", "exercise plan", "fertility", "fibroids",
    "fitness", "flu shot", "foot pain", "gallstones", "gastroenteritis", "gastroenterologist ",
    "genetic counseling", "giving birth", "glasses prescription", "hair loss", "head lice",
    "headache", "hemorrhoids", "hepatitis b", "high blood pressure", "hip replacement", "hiv",
    "home healthcare medical devices", "hormones", "hrt", "hyperhidrosis", "immunizations",
    "in-vitro fertilization", "infertility", "insomnia", "internalist", "Irritable Bowel Syndrome",
    "iud", "IVF", "kidney stones", "knee", "knee injury", "knee pain", "knee replacement",
    "lab corp", "leukemia", "lipoma", "lipoma removal", "liposuction", "low back pain", "lung",
    "lymphatic", "mammogram", "marriage counseling", "maternity", "melanoma", "menopause",
    "mental health", "midwife", "migraines", "migrane", "moles", "mood disorder", "mri",
    "my kids stomach hurt", "myofascial", "obesity", "osteoporosis ", "pain management",
    "pap smear", "parkinson", "pcos", "Physical therapy ", "postpartum", "postpartum depression",
    "prenatal care", "prostate", "psoriasis", "psycotherapy", "pyschotherapy", "rash",
    "rehabilitation", "renal dialysis", "retina", "root canal", "rosacea", "salpingectomy",
    "scoliosis", "Severe anemia", "shouler replacement ", "sinusitis", "skin biopsy",
    "skin cancer", "social anxiety", "speech therapy", "sports physician", "stress test",
    "substance abuse treatment", "sudden vision loss", "surgery hernia", "tachicardia", "teladoc",
    "tendinitis", "thoriacic", "thyroidectomy ", "tinnitus", "tongue tie", "tonsils",
    "tooth extraction", "varicocelectomy", "vertigo", "wart removal", "Weight loss", "weightloss",
    "x-ray",
];

/// Trims each entry, drops blanks and keeps the first spelling of each
/// case-insensitive duplicate, preserving order.
pub fn unique_trimmed<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// The batch term list, de-duplicated.
pub fn batch_terms() -> Vec<String> {
    unique_trimmed(BATCH_TERMS)
}
