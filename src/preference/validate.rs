//! 선호 조건 검증
//! 실패한 필드를 모두 모아서 반환한다. 필드 이름은 폼과 같은 camelCase 를 쓴다.
use super::model::{Preference, PreferenceDraft};
use crate::error::FieldError;

/// 메모 최대 길이
pub const MAX_NOTES_LEN: usize = 500;

pub fn validate(draft: PreferenceDraft) -> Result<Preference, Vec<FieldError>> {
    let mut errors = Vec::new();

    let shape = required(&draft.shape, "shape", "Shape is required", &mut errors);
    let color = required(&draft.color, "color", "Color is required", &mut errors);
    let clarity = required(&draft.clarity, "clarity", "Clarity is required", &mut errors);
    let currency = required(&draft.currency, "currency", "Currency is required", &mut errors);
    let location = required(&draft.location, "location", "Location is required", &mut errors);

    if draft.carat_min < 0.0 {
        errors.push(FieldError::new("caratMin", "Must be ≥ 0"));
    }
    if draft.carat_max < 0.0 {
        errors.push(FieldError::new("caratMax", "Must be ≥ 0"));
    }
    if draft.carat_max < draft.carat_min {
        errors.push(FieldError::new("caratMax", "Max carat must be ≥ min carat"));
    }
    if draft.budget < 0.0 {
        errors.push(FieldError::new("budget", "Budget must be ≥ 0"));
    }
    if draft.price_per_carat.is_some_and(|p| p < 0.0) {
        errors.push(FieldError::new("pricePerCarat", "Must be ≥ 0"));
    }

    let lab_name = optional(draft.lab_name);
    if draft.lab && lab_name.is_none() {
        errors.push(FieldError::new(
            "labName",
            "Lab name is required when lab-grown is selected",
        ));
    }

    let notes = optional(draft.notes);
    if notes
        .as_deref()
        .is_some_and(|n| n.chars().count() > MAX_NOTES_LEN)
    {
        errors.push(FieldError::new("notes", "Max 500 characters"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Preference {
        shape,
        carat_min: draft.carat_min,
        carat_max: draft.carat_max,
        color,
        clarity,
        lab: draft.lab,
        // 천연석이면 연구소 이름은 의미가 없다
        lab_name: if draft.lab { lab_name } else { None },
        budget: draft.budget,
        currency,
        location,
        price_per_carat: draft.price_per_carat,
        cut: optional(draft.cut),
        polish: optional(draft.polish),
        symmetry: optional(draft.symmetry),
        fluorescence: optional(draft.fluorescence),
        certification: optional(draft.certification),
        priority: optional(draft.priority),
        notes,
    })
}

fn required(
    value: &str,
    field: &'static str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, message));
    }
    value.to_string()
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PreferenceDraft {
        PreferenceDraft {
            shape: "Round".into(),
            color: "D".into(),
            clarity: "VVS1".into(),
            location: "India".into(),
            ..PreferenceDraft::default()
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn inverted_carat_range_fails_on_max() {
        let errors = validate(PreferenceDraft {
            carat_min: 2.0,
            carat_max: 1.0,
            ..filled()
        })
        .unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("caratMax", "Max carat must be ≥ min carat")]
        );
    }

    #[test]
    fn lab_grown_requires_lab_name() {
        let errors = validate(PreferenceDraft {
            lab: true,
            lab_name: Some("".into()),
            ..filled()
        })
        .unwrap_err();
        assert_eq!(fields(&errors), vec!["labName"]);
        assert_eq!(
            errors[0].message,
            "Lab name is required when lab-grown is selected"
        );

        let ok = validate(PreferenceDraft {
            lab: true,
            lab_name: Some("CVD".into()),
            ..filled()
        })
        .unwrap();
        assert_eq!(ok.lab_name.as_deref(), Some("CVD"));
    }

    #[test]
    fn natural_stones_drop_lab_name() {
        let ok = validate(PreferenceDraft {
            lab: false,
            lab_name: Some("HPHT".into()),
            ..filled()
        })
        .unwrap();
        assert_eq!(ok.lab_name, None);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = validate(PreferenceDraft {
            currency: " ".into(),
            ..PreferenceDraft::default()
        })
        .unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["shape", "color", "clarity", "currency", "location"]
        );
    }

    #[test]
    fn negative_numbers_and_long_notes_fail() {
        let errors = validate(PreferenceDraft {
            carat_min: -1.0,
            budget: -5.0,
            price_per_carat: Some(-1.0),
            notes: Some("n".repeat(501)),
            ..filled()
        })
        .unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["caratMin", "budget", "pricePerCarat", "notes"]
        );
    }

    #[test]
    fn blank_optionals_become_none() {
        let ok = validate(PreferenceDraft {
            cut: Some("  ".into()),
            polish: Some(" Excellent ".into()),
            ..filled()
        })
        .unwrap();
        assert_eq!(ok.cut, None);
        assert_eq!(ok.polish.as_deref(), Some("Excellent"));
    }
}
