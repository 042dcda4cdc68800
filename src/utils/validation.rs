use validator::{Validate, ValidationErrors};

pub fn validate<T: Validate>(val: &T) -> Result<(), validator::ValidationErrors> {
    val.validate()
}

/// Flattens field errors into one caller-facing sentence, ordered by field name
/// so the same payload always yields the same message.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.clone(), message)
            })
        })
        .collect();

    if messages.is_empty() {
        return "Invalid request".to_string();
    }

    messages.sort();
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Trims every entry and drops the ones left empty, preserving order and duplicates.
pub fn normalize_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn normalize_list_keeps_order_and_duplicates() {
        let skills = normalize_list(vec![" Go", "", "SQL ", "  ", "Go"]);
        assert_eq!(skills, vec!["Go", "SQL", "Go"]);
    }

    #[test]
    fn describe_errors_orders_by_field() {
        let mut errors = ValidationErrors::new();
        let mut location = ValidationError::new("length");
        location.message = Some("location is required".into());
        let mut department = ValidationError::new("length");
        department.message = Some("department is required".into());
        errors.add("location", location);
        errors.add("department", department);

        assert_eq!(
            describe_errors(&errors),
            "department is required; location is required"
        );
    }

    #[test]
    fn describe_errors_falls_back_to_field_name() {
        let mut errors = ValidationErrors::new();
        errors.add("salary", ValidationError::new("length"));
        assert_eq!(describe_errors(&errors), "salary is invalid");
    }
}
