use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ApplicationCreate, Status};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Company is required")]
    MissingCompany,
    #[error("Role is required")]
    MissingRole,
    #[error("{field} must be a date like 2024-01-31, got '{value}'")]
    BadDate { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Company,
    Role,
    Location,
    Url,
    Status,
    DateApplied,
    NextActionDate,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Company,
        FormField::Role,
        FormField::Location,
        FormField::Url,
        FormField::Status,
        FormField::DateApplied,
        FormField::NextActionDate,
        FormField::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Company => "Company",
            FormField::Role => "Role",
            FormField::Location => "Location",
            FormField::Url => "Link",
            FormField::Status => "Status",
            FormField::DateApplied => "Applied",
            FormField::NextActionDate => "Next action",
            FormField::Notes => "Notes",
        }
    }

    fn next(self) -> FormField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> FormField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Creation form as typed. Text is kept raw until submit.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
    pub company: String,
    pub role: String,
    pub location: String,
    pub url: String,
    pub status: Status,
    pub date_applied: String,
    pub next_action_date: String,
    pub notes: String,
    pub focus: FormField,
    pub error: Option<FormError>,
}

impl CreateForm {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_date_applied(today.format(DATE_FORMAT).to_string())
    }

    pub fn with_date_applied(date_applied: String) -> Self {
        Self {
            company: String::new(),
            role: String::new(),
            location: String::new(),
            url: String::new(),
            status: Status::Applied,
            date_applied,
            next_action_date: String::new(),
            notes: String::new(),
            focus: FormField::Company,
            error: None,
        }
    }

    /// Blank form that keeps the applied date of the previous entry.
    pub fn reset_keeping_date(&self) -> Self {
        Self::with_date_applied(self.date_applied.clone())
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Status => self.status.to_string(),
            _ => self.text(field).map(String::clone).unwrap_or_default(),
        }
    }

    fn text(&self, field: FormField) -> Option<&String> {
        match field {
            FormField::Company => Some(&self.company),
            FormField::Role => Some(&self.role),
            FormField::Location => Some(&self.location),
            FormField::Url => Some(&self.url),
            FormField::DateApplied => Some(&self.date_applied),
            FormField::NextActionDate => Some(&self.next_action_date),
            FormField::Notes => Some(&self.notes),
            FormField::Status => None,
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Company => Some(&mut self.company),
            FormField::Role => Some(&mut self.role),
            FormField::Location => Some(&mut self.location),
            FormField::Url => Some(&mut self.url),
            FormField::DateApplied => Some(&mut self.date_applied),
            FormField::NextActionDate => Some(&mut self.next_action_date),
            FormField::Notes => Some(&mut self.notes),
            FormField::Status => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn insert_char(&mut self, c: char) {
        let focus = self.focus;
        if let Some(text) = self.text_mut(focus) {
            text.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        if let Some(text) = self.text_mut(focus) {
            text.pop();
            self.error = None;
        }
    }

    /// Left/right on the status field.
    pub fn cycle_status(&mut self, forward: bool) {
        if self.focus == FormField::Status {
            self.status = if forward {
                self.status.next()
            } else {
                self.status.prev()
            };
        }
    }

    pub fn to_payload(&self) -> Result<ApplicationCreate, FormError> {
        let company = self.company.trim();
        if company.is_empty() {
            return Err(FormError::MissingCompany);
        }
        let role = self.role.trim();
        if role.is_empty() {
            return Err(FormError::MissingRole);
        }
        let date_applied = parse_date("Applied date", &self.date_applied)?;
        let next_action_date = match self.next_action_date.trim() {
            "" => None,
            value => Some(parse_date("Next action date", value)?),
        };

        Ok(ApplicationCreate {
            company: company.to_string(),
            role: role.to_string(),
            location: optional(&self.location),
            url: optional(&self.url),
            status: self.status,
            date_applied,
            next_action_date,
            notes: optional(&self.notes),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| FormError::BadDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn typed(form: &mut CreateForm, field: FormField, text: &str) {
        form.focus = field;
        for c in text.chars() {
            form.insert_char(c);
        }
    }

    #[test]
    fn test_defaults_to_applied_today() {
        let form = CreateForm::new(jan_first());
        assert_eq!(form.status, Status::Applied);
        assert_eq!(form.date_applied, "2024-01-01");
        assert_eq!(form.focus, FormField::Company);
    }

    #[test]
    fn test_payload_trims_and_nulls_empty_optionals() {
        let mut form = CreateForm::new(jan_first());
        typed(&mut form, FormField::Company, "  Acme ");
        typed(&mut form, FormField::Role, "SWE");
        typed(&mut form, FormField::Location, "   ");
        typed(&mut form, FormField::Notes, " call back ");

        let payload = form.to_payload().unwrap();
        assert_eq!(payload.company, "Acme");
        assert_eq!(payload.role, "SWE");
        assert_eq!(payload.location, None);
        assert_eq!(payload.url, None);
        assert_eq!(payload.next_action_date, None);
        assert_eq!(payload.notes.as_deref(), Some("call back"));
        assert_eq!(payload.date_applied, jan_first());
    }

    #[test]
    fn test_required_fields() {
        let mut form = CreateForm::new(jan_first());
        assert_eq!(form.to_payload(), Err(FormError::MissingCompany));
        typed(&mut form, FormField::Company, "Acme");
        assert_eq!(form.to_payload(), Err(FormError::MissingRole));
    }

    #[test]
    fn test_bad_next_action_date_is_rejected() {
        let mut form = CreateForm::new(jan_first());
        typed(&mut form, FormField::Company, "Acme");
        typed(&mut form, FormField::Role, "SWE");
        typed(&mut form, FormField::NextActionDate, "next week");
        assert!(matches!(
            form.to_payload(),
            Err(FormError::BadDate { field: "Next action date", .. })
        ));
    }

    #[test]
    fn test_status_field_takes_no_text() {
        let mut form = CreateForm::new(jan_first());
        form.focus = FormField::Status;
        form.insert_char('x');
        form.cycle_status(true);
        assert_eq!(form.status, Status::Interview);
        form.cycle_status(false);
        form.cycle_status(false);
        assert_eq!(form.status, Status::Saved);
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = CreateForm::new(jan_first());
        form.focus_prev();
        assert_eq!(form.focus, FormField::Notes);
        form.focus_next();
        assert_eq!(form.focus, FormField::Company);
    }

    #[test]
    fn test_reset_keeps_applied_date() {
        let mut form = CreateForm::new(jan_first());
        typed(&mut form, FormField::Company, "Acme");
        form.date_applied = "2023-12-24".to_string();
        let reset = form.reset_keeping_date();
        assert_eq!(reset.company, "");
        assert_eq!(reset.date_applied, "2023-12-24");
    }
}
