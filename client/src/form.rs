//! Create/edit trip form validation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::types::{CreateTripRequest, FuelType, Trip, TripStatus, UpdateTripRequest};

/// `datetime-local` input format
const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
pub const MAX_LITERS: i64 = 30_000;

/// Field name → first error message
pub type FormErrors = BTreeMap<String, String>;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn text_rule(
    value: &str,
    max: usize,
    required: &'static str,
    too_long: &'static str,
) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        Err(error("required", required))
    } else if len > max {
        Err(error("length", too_long))
    } else {
        Ok(())
    }
}

fn validate_truck(value: &str) -> Result<(), ValidationError> {
    text_rule(value, 20, "Camión es requerido", "Camión no puede exceder 20 caracteres")
}

fn validate_driver(value: &str) -> Result<(), ValidationError> {
    text_rule(
        value,
        100,
        "Conductor es requerido",
        "Nombre del conductor no puede exceder 100 caracteres",
    )
}

fn validate_origin(value: &str) -> Result<(), ValidationError> {
    text_rule(value, 100, "Origen es requerido", "Origen no puede exceder 100 caracteres")
}

fn validate_destination(value: &str) -> Result<(), ValidationError> {
    text_rule(value, 100, "Destino es requerido", "Destino no puede exceder 100 caracteres")
}

fn validate_liters(value: i64) -> Result<(), ValidationError> {
    if value < 1 {
        Err(error("range", "La cantidad debe ser mayor a 0"))
    } else if value > MAX_LITERS {
        Err(error("range", "La cantidad no puede exceder 30,000 litros"))
    } else {
        Ok(())
    }
}

/// Raw form input, as typed
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct TripForm {
    #[validate(custom(function = "validate_truck"))]
    pub truck: String,
    #[validate(custom(function = "validate_driver"))]
    pub driver: String,
    #[validate(custom(function = "validate_origin"))]
    pub origin: String,
    #[validate(custom(function = "validate_destination"))]
    pub destination: String,
    pub fuel: Option<FuelType>,
    pub liters: i64,
    /// RFC 3339, or `YYYY-MM-DDTHH:MM` in local time
    pub departure_date: String,
    /// Only used by the edit form
    pub status: Option<TripStatus>,
}

impl TripForm {
    /// Prefill the edit form from an existing trip.
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            truck: trip.truck.clone(),
            driver: trip.driver.clone(),
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            fuel: Some(trip.fuel),
            liters: i64::from(trip.liters),
            departure_date: trip
                .departure_date
                .with_timezone(&Local)
                .format(LOCAL_INPUT_FORMAT)
                .to_string(),
            status: Some(trip.status),
        }
    }

    /// All field errors, with the departure date checked against `now`.
    pub fn errors_at(&self, now: DateTime<Utc>) -> FormErrors {
        let mut errors = collect(self.validate().err());

        if let Err(e) = validate_liters(self.liters) {
            insert(&mut errors, "liters", &e);
        }
        if self.fuel.is_none() {
            errors.insert(
                "fuel".into(),
                "Selecciona un tipo de combustible válido".into(),
            );
        }
        match parse_departure(&self.departure_date) {
            None if self.departure_date.trim().is_empty() => {
                errors.insert("departure_date".into(), "Fecha de salida es requerida".into());
            }
            None => {
                errors.insert("departure_date".into(), "Fecha de salida inválida".into());
            }
            Some(date) if date <= now => {
                errors.insert(
                    "departure_date".into(),
                    "La fecha de salida debe ser posterior al momento actual".into(),
                );
            }
            Some(_) => {}
        }
        errors
    }

    /// Validate and convert into a create request. The truck plate is
    /// upper-cased and every text field trimmed.
    pub fn to_create_request(&self, now: DateTime<Utc>) -> Result<CreateTripRequest, FormErrors> {
        let errors = self.errors_at(now);
        match (errors.is_empty(), self.fuel, parse_departure(&self.departure_date)) {
            (true, Some(fuel), Some(departure_date)) => Ok(CreateTripRequest {
                truck: self.truck.trim().to_uppercase(),
                driver: self.driver.trim().to_string(),
                origin: self.origin.trim().to_string(),
                destination: self.destination.trim().to_string(),
                fuel,
                liters: self.liters as i32,
                departure_date,
            }),
            _ => Err(errors),
        }
    }

    /// Edit form: same rules plus a required status.
    pub fn to_update_request(&self, now: DateTime<Utc>) -> Result<UpdateTripRequest, FormErrors> {
        let create = self.to_create_request(now);
        match (create, self.status) {
            (Ok(req), Some(status)) => Ok(UpdateTripRequest {
                truck: Some(req.truck),
                driver: Some(req.driver),
                origin: Some(req.origin),
                destination: Some(req.destination),
                fuel: Some(req.fuel),
                liters: Some(req.liters),
                departure_date: Some(req.departure_date),
                status: Some(status),
            }),
            (result, status) => {
                let mut errors = result.err().unwrap_or_default();
                if status.is_none() {
                    errors.insert("status".into(), "Selecciona un estado válido".into());
                }
                Err(errors)
            }
        }
    }
}

fn parse_departure(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, LOCAL_INPUT_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn insert(errors: &mut FormErrors, field: &str, e: &ValidationError) {
    if let Some(message) = &e.message {
        errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }
}

fn collect(errors: Option<ValidationErrors>) -> FormErrors {
    let mut out = FormErrors::new();
    if let Some(errors) = errors {
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                insert(&mut out, &field, first);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn valid_form(now: DateTime<Utc>) -> TripForm {
        TripForm {
            truck: " abc123 ".into(),
            driver: " Juan Pérez ".into(),
            origin: "Refinería La Plata".into(),
            destination: "YPF Recoleta".into(),
            fuel: Some(FuelType::Diesel),
            liters: 15_000,
            departure_date: (now + Duration::hours(2)).to_rfc3339(),
            status: None,
        }
    }

    #[test]
    fn valid_form_becomes_normalized_request() {
        let now = Utc::now();
        let request = valid_form(now).to_create_request(now).unwrap();
        assert_eq!(request.truck, "ABC123");
        assert_eq!(request.driver, "Juan Pérez");
        assert_eq!(request.liters, 15_000);
        assert!(request.departure_date > now);
    }

    #[test]
    fn every_rule_reports_its_field() {
        let now = Utc::now();
        let form = TripForm {
            truck: "X".repeat(21),
            driver: "   ".into(),
            origin: String::new(),
            destination: "D".repeat(101),
            fuel: None,
            liters: 30_001,
            departure_date: (now - Duration::minutes(1)).to_rfc3339(),
            status: None,
        };
        let errors = form.to_create_request(now).unwrap_err();

        assert_eq!(errors["truck"], "Camión no puede exceder 20 caracteres");
        assert_eq!(errors["driver"], "Conductor es requerido");
        assert_eq!(errors["origin"], "Origen es requerido");
        assert_eq!(errors["destination"], "Destino no puede exceder 100 caracteres");
        assert_eq!(errors["fuel"], "Selecciona un tipo de combustible válido");
        assert_eq!(errors["liters"], "La cantidad no puede exceder 30,000 litros");
        assert_eq!(
            errors["departure_date"],
            "La fecha de salida debe ser posterior al momento actual"
        );
    }

    #[test]
    fn zero_liters_and_blank_date() {
        let now = Utc::now();
        let mut form = valid_form(now);
        form.liters = 0;
        form.departure_date = String::new();
        let errors = form.errors_at(now);
        assert_eq!(errors["liters"], "La cantidad debe ser mayor a 0");
        assert_eq!(errors["departure_date"], "Fecha de salida es requerida");
    }

    #[test]
    fn edit_form_requires_status() {
        let now = Utc::now();
        let form = valid_form(now);
        let errors = form.to_update_request(now).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("status"));

        let mut form = valid_form(now);
        form.status = Some(TripStatus::InTransit);
        let update = form.to_update_request(now).unwrap();
        assert_eq!(update.status, Some(TripStatus::InTransit));
        assert_eq!(update.truck.as_deref(), Some("ABC123"));
    }

    #[test]
    fn local_input_format_is_accepted() {
        let future = (Local::now() + Duration::days(2)).format(LOCAL_INPUT_FORMAT).to_string();
        assert!(parse_departure(&future).is_some());
        assert!(parse_departure("tomorrow").is_none());
    }
}
