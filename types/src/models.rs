//! Records exchanged with the backend and rendered by the console.

use std::cmp::Ordering;

use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::{
    role::Role,
    table::{Sortable, compare_text},
    upload::{FileMeta, Upload, UploadError, UploadKind},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),
    #[error("a station is required for the {0} role")]
    MissingStation(Role),
    #[error("at most {max} registration documents can be attached, got {got}")]
    TooManyDocuments { max: usize, got: usize },
    #[error(transparent)]
    Upload(#[from] UploadError),
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(())
    }
}

fn require_email(value: &str) -> Result<(), FormError> {
    require(value, "email")?;
    match value.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(FormError::InvalidEmail(value.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub station_id: Option<Uuid>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Name,
    Email,
    Role,
}

impl Sortable<UserColumn> for User {
    fn compare(&self, other: &Self, column: UserColumn) -> Ordering {
        match column {
            UserColumn::Name => compare_text(&self.full_name(), &other.full_name()),
            UserColumn::Email => compare_text(&self.email, &other.email),
            UserColumn::Role => self.role.id().cmp(&other.role.id()),
        }
    }
}

/// Create/edit payload for a user. `password` is only sent on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: Some(user.role),
            station_id: user.station_id,
            password: None,
        }
    }

    pub fn validate(&self, creating: bool) -> Result<(), FormError> {
        require(&self.first_name, "first name")?;
        require(&self.last_name, "last name")?;
        require_email(&self.email)?;
        let role = self.role.ok_or(FormError::Missing("role"))?;
        if role.is_station_scoped() && self.station_id.is_none() {
            return Err(FormError::MissingStation(role));
        }
        if creating {
            require(self.password.as_deref().unwrap_or_default(), "password")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCenter {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub owner_name: String,
    pub vat_number: String,
    pub registration_number: String,
    pub contact_number: String,
    pub email: String,
    pub opening_hours: Option<Time>,
    pub closing_hours: Option<Time>,
    pub is_active: bool,
    #[serde(default)]
    pub photo_url: Option<Url>,
    #[serde(default)]
    pub document_urls: Vec<Url>,
}

impl ServiceCenter {
    /// "08:00 - 18:00", or "Not set".
    pub fn hours(&self) -> String {
        match (self.opening_hours, self.closing_hours) {
            (Some(open), Some(close)) => {
                format!("{} - {}", open.strftime("%H:%M"), close.strftime("%H:%M"))
            }
            _ => "Not set".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCenterColumn {
    Name,
    Owner,
    Address,
    Status,
}

impl Sortable<ServiceCenterColumn> for ServiceCenter {
    fn compare(&self, other: &Self, column: ServiceCenterColumn) -> Ordering {
        match column {
            ServiceCenterColumn::Name => compare_text(&self.name, &other.name),
            ServiceCenterColumn::Owner => compare_text(&self.owner_name, &other.owner_name),
            ServiceCenterColumn::Address => compare_text(&self.address, &other.address),
            ServiceCenterColumn::Status => other.is_active.cmp(&self.is_active),
        }
    }
}

/// Registration payload for a new service center, as received from the
/// browser's multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCenterForm {
    pub name: String,
    pub address: String,
    pub owner_name: String,
    pub vat_number: String,
    pub registration_number: String,
    pub contact_number: String,
    pub email: String,
    pub opening_hours: Option<Time>,
    pub closing_hours: Option<Time>,
    pub photo: Option<Upload>,
    pub documents: Vec<Upload>,
}

/// Multipart field names of the registration form, shared by the page and
/// the route that receives it.
pub mod center_fields {
    pub const NAME: &str = "name";
    pub const ADDRESS: &str = "address";
    pub const OWNER_NAME: &str = "ownerName";
    pub const VAT_NUMBER: &str = "vatNumber";
    pub const REGISTRATION_NUMBER: &str = "registrationNumber";
    pub const CONTACT_NUMBER: &str = "contactNumber";
    pub const EMAIL: &str = "email";
    pub const OPENING_HOURS: &str = "openingHours";
    pub const CLOSING_HOURS: &str = "closingHours";
    pub const PHOTO: &str = "photo";
    pub const DOCUMENTS: &str = "documents";
}

impl ServiceCenterForm {
    pub const MAX_DOCUMENTS: usize = 5;
    pub const SUBMIT_PATH: &str = "/service-centers/register";

    /// Largest multipart body a complete registration can need: the photo,
    /// every document at its ceiling, and a megabyte for the text fields.
    pub const fn max_body_bytes() -> u64 {
        UploadKind::Photo.max_bytes()
            + Self::MAX_DOCUMENTS as u64 * UploadKind::Document.max_bytes()
            + 1024 * 1024
    }

    pub fn validate(&self) -> Result<(), FormError> {
        self.validate_details()?;
        let photo = self.photo.as_ref().map(Upload::meta);
        let documents: Vec<FileMeta> = self.documents.iter().map(Upload::meta).collect();
        validate_attachments(photo.as_ref(), &documents)
    }

    /// Everything but the attached files.
    pub fn validate_details(&self) -> Result<(), FormError> {
        require(&self.name, "name")?;
        require(&self.address, "address")?;
        require(&self.owner_name, "owner name")?;
        require(&self.vat_number, "VAT number")?;
        require(&self.registration_number, "registration number")?;
        require(&self.contact_number, "contact number")?;
        require_email(&self.email)?;
        self.opening_hours.ok_or(FormError::Missing("opening hours"))?;
        self.closing_hours.ok_or(FormError::Missing("closing hours"))?;
        Ok(())
    }
}

/// A registration needs one photo and between one and
/// `ServiceCenterForm::MAX_DOCUMENTS` documents, each within its ceiling.
pub fn validate_attachments(photo: Option<&FileMeta>, documents: &[FileMeta]) -> Result<(), FormError> {
    photo
        .ok_or(FormError::Missing("photo"))?
        .validate(UploadKind::Photo)?;

    if documents.is_empty() {
        return Err(FormError::Missing("registration documents"));
    }
    if documents.len() > ServiceCenterForm::MAX_DOCUMENTS {
        return Err(FormError::TooManyDocuments {
            max: ServiceCenterForm::MAX_DOCUMENTS,
            got: documents.len(),
        });
    }
    for document in documents {
        document.validate(UploadKind::Document)?;
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub owner_name: String,
    pub date: Date,
    #[serde(default)]
    pub time: Option<Time>,
    pub vehicle_number: String,
    #[serde(default)]
    pub vehicle_type: String,
    pub services: Vec<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentColumn {
    Owner,
    Date,
    Vehicle,
    Status,
}

impl Sortable<AppointmentColumn> for Appointment {
    fn compare(&self, other: &Self, column: AppointmentColumn) -> Ordering {
        match column {
            AppointmentColumn::Owner => compare_text(&self.owner_name, &other.owner_name),
            AppointmentColumn::Date => (self.date, self.time).cmp(&(other.date, other.time)),
            AppointmentColumn::Vehicle => compare_text(&self.vehicle_number, &other.vehicle_number),
            AppointmentColumn::Status => compare_text(&self.status, &other.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub client_name: String,
    /// 1..=5
    pub rating: u8,
    pub service_center: String,
    #[serde(default)]
    pub comment: String,
    pub created_at: Timestamp,
}

impl Feedback {
    pub const MAX_RATING: u8 = 5;

    pub fn clamped_rating(&self) -> u8 {
        self.rating.clamp(1, Self::MAX_RATING)
    }
}

/// Mean rating with one decimal, or `None` with no reviews.
pub fn average_rating(feedback: &[Feedback]) -> Option<f32> {
    if feedback.is_empty() {
        return None;
    }
    let total: u32 = feedback.iter().map(|f| u32::from(f.clamped_rating())).sum();
    let mean = total as f32 / feedback.len() as f32;
    Some((mean * 10.0).round() / 10.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPoints {
    pub customer_id: Uuid,
    pub customer_name: String,
    #[serde(default)]
    pub email: String,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerColumn {
    Name,
    Points,
}

impl Sortable<CustomerColumn> for CustomerPoints {
    fn compare(&self, other: &Self, column: CustomerColumn) -> Ordering {
        match column {
            CustomerColumn::Name => compare_text(&self.customer_name, &other.customer_name),
            CustomerColumn::Points => self.points.cmp(&other.points),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAvailability {
    pub service_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub available: bool,
}

impl ServiceAvailability {
    pub fn toggled(&self) -> Self {
        Self {
            available: !self.available,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{SortState, sort_rows};
    use jiff::civil::{date, time};

    fn upload(content_type: &str, len: usize) -> Upload {
        Upload {
            file_name: "file".into(),
            content_type: content_type.into(),
            bytes: vec![0; len],
        }
    }

    fn center_form() -> ServiceCenterForm {
        ServiceCenterForm {
            name: "Downtown Auto".into(),
            address: "12 Main St".into(),
            owner_name: "Sam Perera".into(),
            vat_number: "VAT-123".into(),
            registration_number: "REG-9".into(),
            contact_number: "+94 11 234 5678".into(),
            email: "ops@downtown.example".into(),
            opening_hours: Some(time(8, 0, 0, 0)),
            closing_hours: Some(time(18, 0, 0, 0)),
            photo: Some(upload("image/png", 10)),
            documents: vec![upload("application/pdf", 10)],
        }
    }

    #[test]
    fn complete_center_form_is_valid() {
        assert_eq!(center_form().validate(), Ok(()));
    }

    #[test]
    fn center_form_reports_first_missing_field() {
        let form = ServiceCenterForm {
            vat_number: "  ".into(),
            ..center_form()
        };
        assert_eq!(form.validate(), Err(FormError::Missing("VAT number")));
    }

    #[test]
    fn center_form_validates_uploads() {
        let form = ServiceCenterForm {
            photo: Some(upload("application/pdf", 10)),
            ..center_form()
        };
        assert!(matches!(form.validate(), Err(FormError::Upload(_))));

        let form = ServiceCenterForm {
            documents: vec![],
            ..center_form()
        };
        assert_eq!(form.validate(), Err(FormError::Missing("registration documents")));
    }

    #[test]
    fn center_form_caps_document_count() {
        let form = ServiceCenterForm {
            documents: vec![upload("application/pdf", 10); ServiceCenterForm::MAX_DOCUMENTS + 1],
            ..center_form()
        };
        assert_eq!(
            form.validate(),
            Err(FormError::TooManyDocuments { max: 5, got: 6 })
        );
    }

    #[test]
    fn details_can_be_checked_before_files_are_picked() {
        let form = ServiceCenterForm {
            photo: None,
            documents: vec![],
            ..center_form()
        };
        assert_eq!(form.validate_details(), Ok(()));
        assert_eq!(form.validate(), Err(FormError::Missing("photo")));
    }

    #[test]
    fn body_limit_fits_a_full_registration() {
        assert_eq!(ServiceCenterForm::max_body_bytes(), (3 + 5 * 50 + 1) * 1024 * 1024);
    }

    #[test]
    fn user_form_requires_password_only_on_create() {
        let form = UserForm {
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            email: "ana@example.com".into(),
            role: Some(Role::Admin),
            station_id: None,
            password: None,
        };
        assert_eq!(form.validate(false), Ok(()));
        assert_eq!(form.validate(true), Err(FormError::Missing("password")));
    }

    #[test]
    fn user_form_requires_station_for_scoped_roles() {
        let form = UserForm {
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            email: "ana@example.com".into(),
            role: Some(Role::Cashier),
            ..Default::default()
        };
        assert_eq!(form.validate(false), Err(FormError::MissingStation(Role::Cashier)));
    }

    #[test]
    fn user_form_rejects_bad_email() {
        let form = UserForm {
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            email: "ana-at-example".into(),
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert!(matches!(form.validate(false), Err(FormError::InvalidEmail(_))));
    }

    #[test]
    fn toggling_flips_only_availability() {
        let service = ServiceAvailability {
            service_id: Uuid::nil(),
            name: "Oil change".into(),
            description: String::new(),
            available: true,
        };
        let toggled = service.toggled();
        assert!(!toggled.available);
        assert_eq!(toggled.name, service.name);
        assert_eq!(toggled.toggled(), service);
    }

    #[test]
    fn appointments_sort_by_date_then_time() {
        let appointment = |owner: &str, day: i8, hour: Option<i8>| Appointment {
            id: Uuid::nil(),
            owner_name: owner.into(),
            date: date(2025, 3, day),
            time: hour.map(|h| time(h, 0, 0, 0)),
            vehicle_number: "CAB-1234".into(),
            vehicle_type: "Car".into(),
            services: vec!["Wash".into()],
            status: "Pending".into(),
        };
        let mut rows = vec![
            appointment("c", 6, Some(9)),
            appointment("b", 5, Some(14)),
            appointment("a", 5, Some(9)),
        ];
        sort_rows(&mut rows, SortState::new(AppointmentColumn::Date));
        let owners: Vec<_> = rows.iter().map(|a| a.owner_name.as_str()).collect();
        assert_eq!(owners, ["a", "b", "c"]);
    }

    #[test]
    fn averages_ratings() {
        let review = |rating| Feedback {
            id: Uuid::nil(),
            client_name: "x".into(),
            rating,
            service_center: "y".into(),
            comment: String::new(),
            created_at: Timestamp::UNIX_EPOCH,
        };
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[review(5), review(4), review(4)]), Some(4.3));
    }

    #[test]
    fn user_json_uses_backend_field_names() {
        let json = serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "firstName": "Ana",
            "lastName": "Silva",
            "email": "ana@example.com",
            "role": "ServiceCenterAdmin",
            "stationId": "00000000-0000-0000-0000-000000000001"
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.full_name(), "Ana Silva");
        assert_eq!(user.role, Role::ServiceCenterAdmin);
        assert!(user.station_id.is_some());
    }
}
