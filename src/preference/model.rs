use serde::{Deserialize, Serialize};

// region:    --- Option Lists
pub const SHAPES: &[&str] = &[
    "Round", "Princess", "Cushion", "Oval", "Emerald", "Pear", "Marquise", "Radiant", "Asscher",
    "Heart",
];
pub const COLORS: &[&str] = &["D", "E", "F", "G", "H", "I", "J", "K", "L", "M"];
pub const CLARITIES: &[&str] = &[
    "FL", "IF", "VVS1", "VVS2", "VS1", "VS2", "SI1", "SI2", "I1", "I2",
];
pub const CERTIFICATIONS: &[&str] = &["GIA", "IGI", "AGS", "HRD", "EGL"];
pub const CUTS: &[&str] = &["Ideal", "Excellent", "Very Good", "Good", "Fair"];
pub const POLISHES: &[&str] = &["Excellent", "Very Good", "Good", "Fair", "Poor"];
pub const SYMMETRIES: &[&str] = &["Excellent", "Very Good", "Good", "Fair", "Poor"];
pub const FLUORESCENCES: &[&str] = &["None", "Faint", "Medium", "Strong", "Very Strong"];
pub const CURRENCIES: &[&str] = &["USD", "INR", "EUR", "GBP", "AED"];
pub const LOCATIONS: &[&str] = &[
    "India", "USA", "Belgium", "Hong Kong", "Dubai", "Israel", "UK",
];

/// 선호 조건 폼의 선택지 목록
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceOptions {
    pub shapes: &'static [&'static str],
    pub colors: &'static [&'static str],
    pub clarities: &'static [&'static str],
    pub certifications: &'static [&'static str],
    pub cuts: &'static [&'static str],
    pub polishes: &'static [&'static str],
    pub symmetries: &'static [&'static str],
    pub fluorescences: &'static [&'static str],
    pub currencies: &'static [&'static str],
    pub locations: &'static [&'static str],
}

pub fn options() -> PreferenceOptions {
    PreferenceOptions {
        shapes: SHAPES,
        colors: COLORS,
        clarities: CLARITIES,
        certifications: CERTIFICATIONS,
        cuts: CUTS,
        polishes: POLISHES,
        symmetries: SYMMETRIES,
        fluorescences: FLUORESCENCES,
        currencies: CURRENCIES,
        locations: LOCATIONS,
    }
}
// endregion: --- Option Lists

// region:    --- Draft
/// 입력 중인 선호 조건. 검증 전이므로 모든 값이 비어 있을 수 있다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferenceDraft {
    pub shape: String,
    pub carat_min: f64,
    pub carat_max: f64,
    pub color: String,
    pub clarity: String,
    pub lab: bool,
    pub budget: f64,
    pub currency: String,
    pub location: String,
    pub lab_name: Option<String>,
    pub price_per_carat: Option<f64>,
    pub cut: Option<String>,
    pub polish: Option<String>,
    pub symmetry: Option<String>,
    pub fluorescence: Option<String>,
    pub certification: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

/// 빈 폼의 기본값
impl Default for PreferenceDraft {
    fn default() -> Self {
        Self {
            shape: String::new(),
            carat_min: 0.5,
            carat_max: 3.0,
            color: String::new(),
            clarity: String::new(),
            lab: false,
            budget: 10000.0,
            currency: "USD".to_string(),
            location: String::new(),
            lab_name: None,
            price_per_carat: None,
            cut: None,
            polish: None,
            symmetry: None,
            fluorescence: None,
            certification: None,
            priority: None,
            notes: None,
        }
    }
}
// endregion: --- Draft

// region:    --- Preference
/// 검증을 통과한 선호 조건
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub shape: String,
    pub carat_min: f64,
    pub carat_max: f64,
    pub color: String,
    pub clarity: String,
    pub lab: bool,
    pub lab_name: Option<String>,
    pub budget: f64,
    pub currency: String,
    pub location: String,
    pub price_per_carat: Option<f64>,
    pub cut: Option<String>,
    pub polish: Option<String>,
    pub symmetry: Option<String>,
    pub fluorescence: Option<String>,
    pub certification: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

/// 저장된 선호 조건
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPreference {
    pub id: String,
    #[serde(flatten)]
    pub preference: Preference,
}
// endregion: --- Preference
