use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::{
    Selectable,
    prelude::{AsChangeset, Identifiable, Insertable, Queryable},
};
use serde::Serialize;
use utoipa::ToSchema;

// Patients

#[derive(Queryable, Selectable, Identifiable, Debug)]
#[diesel(table_name = crate::schema::patients)]
#[diesel(primary_key(patient_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PatientEntity {
    pub patient_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::patients)]
pub struct CreatePatientEntity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

// Doctors

#[derive(Queryable, Selectable, Identifiable, Debug)]
#[diesel(table_name = crate::schema::doctors)]
#[diesel(primary_key(doctor_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DoctorEntity {
    pub doctor_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a doctor, without credentials.
#[derive(Queryable, Selectable, Serialize, Debug, ToSchema)]
#[diesel(table_name = crate::schema::doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DoctorProfile {
    pub doctor_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::doctors)]
pub struct CreateDoctorEntity {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub email: String,
    pub password_hash: String,
}

// Appointments

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::appointments)]
pub struct CreateAppointmentEntity {
    pub patient_id: i32,
    pub doctor_id: i32,
    pub appointment_time: NaiveDateTime,
    pub status: String,
}

/// Partial update of an appointment. Only `status` and `visit_notes` may be
/// changed, and `None` fields are left out of the generated `SET` clause.
#[derive(AsChangeset, Default, Debug, PartialEq)]
#[diesel(table_name = crate::schema::appointments)]
pub struct UpdateAppointmentEntity {
    pub status: Option<String>,
    pub visit_notes: Option<String>,
}

impl UpdateAppointmentEntity {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.visit_notes.is_none()
    }
}

/// Appointment as seen from the patient dashboard.
#[derive(Queryable, Serialize, Debug, ToSchema)]
pub struct PatientAppointmentRow {
    pub appointment_id: i32,
    pub patient_id: i32,
    pub appointment_time: NaiveDateTime,
    pub status: String,
    pub visit_notes: Option<String>,
    pub doctor_id: i32,
    pub doctor_first_name: String,
    pub doctor_last_name: String,
    pub specialization: String,
}

/// Appointment as seen from the doctor dashboard.
#[derive(Queryable, Serialize, Debug, ToSchema)]
pub struct DoctorAppointmentRow {
    pub appointment_id: i32,
    pub doctor_id: i32,
    pub appointment_time: NaiveDateTime,
    pub status: String,
    pub visit_notes: Option<String>,
    pub patient_id: i32,
    pub patient_first_name: String,
    pub patient_last_name: String,
}

// Prescriptions

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, ToSchema)]
#[diesel(table_name = crate::schema::prescriptions)]
#[diesel(primary_key(prescription_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PrescriptionEntity {
    pub prescription_id: i32,
    pub appointment_id: i32,
    pub medication_name: String,
    pub dosage: String,
    pub instructions: Option<String>,
    pub is_ordered: bool,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::prescriptions)]
pub struct CreatePrescriptionEntity {
    pub appointment_id: i32,
    pub medication_name: String,
    pub dosage: String,
    pub instructions: Option<String>,
}

#[derive(Queryable, Serialize, Debug, ToSchema)]
pub struct PatientPrescriptionRow {
    pub prescription_id: i32,
    pub medication_name: String,
    pub dosage: String,
    pub instructions: Option<String>,
    pub is_ordered: bool,
    pub appointment_time: NaiveDateTime,
    pub doctor_first_name: String,
    pub doctor_last_name: String,
}

// Pharmacy orders

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, ToSchema)]
#[diesel(table_name = crate::schema::pharmacy_orders)]
#[diesel(primary_key(order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PharmacyOrderEntity {
    pub order_id: i32,
    pub patient_id: i32,
    pub shipping_address: String,
    pub status: String,
    pub order_date: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::pharmacy_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreatePharmacyOrderEntity {
    pub patient_id: i32,
    pub shipping_address: String,
    pub status: String,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemEntity {
    pub order_id: i32,
    pub prescription_id: i32,
}
