//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database exactly. They are used by Diesel
//! for compile-time query validation and type-safe SQL generation. The
//! database is expected to carry a unique constraint on `users.email` and on
//! `vaccination_records (pet_id, record_type)`. Dependent tables reference
//! `pets` without cascading deletes.

diesel::table! {
    /// Clinic accounts.
    users (id) {
        id -> Int8,
        name -> Text,
        /// Unique login email.
        email -> Text,
        /// PHC-formatted Argon2id hash.
        password_hash -> Text,
        /// `USER` or `ADMIN`.
        role -> Text,
    }
}

diesel::table! {
    pets (id) {
        id -> Int8,
        name -> Text,
        species -> Text,
        breed -> Text,
        birth_date -> Timestamptz,
        color -> Text,
        owner_id -> Int8,
    }
}

diesel::table! {
    activities (id) {
        id -> Int8,
        activity_type -> Text,
        description -> Text,
        date -> Timestamptz,
        pet_id -> Int8,
    }
}

diesel::table! {
    consultations (id) {
        id -> Int8,
        veterinarian -> Text,
        description -> Text,
        date -> Timestamptz,
        pet_id -> Int8,
    }
}

diesel::table! {
    treatments (id) {
        id -> Int8,
        name -> Text,
        description -> Text,
        start_date -> Timestamptz,
        end_date -> Timestamptz,
        pet_id -> Int8,
    }
}

diesel::table! {
    /// Vaccination cards; unique on `(pet_id, record_type)`.
    vaccination_records (id) {
        id -> Int8,
        /// `adulto`, `cachorro` or `gatito`.
        record_type -> Text,
        pet_id -> Int8,
    }
}

diesel::table! {
    vaccinations (id) {
        id -> Int8,
        name -> Text,
        /// Always UTC midnight.
        application_date -> Timestamptz,
        /// NUMERIC(10, 2).
        weight -> Numeric,
        pet_id -> Int8,
        vaccination_record_id -> Int8,
    }
}

diesel::joinable!(pets -> users (owner_id));
diesel::joinable!(activities -> pets (pet_id));
diesel::joinable!(consultations -> pets (pet_id));
diesel::joinable!(treatments -> pets (pet_id));
diesel::joinable!(vaccination_records -> pets (pet_id));
diesel::joinable!(vaccinations -> pets (pet_id));
diesel::joinable!(vaccinations -> vaccination_records (vaccination_record_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    pets,
    activities,
    consultations,
    treatments,
    vaccination_records,
    vaccinations,
);
