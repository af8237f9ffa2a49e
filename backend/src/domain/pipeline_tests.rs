//! Tests for the record mutation pipeline.

use chrono::Duration;
use rstest::rstest;
use rust_decimal::Decimal;

use super::*;
use crate::domain::ports::RecordStore;
use crate::domain::{
    Activity, ActivityPatch, Consultation, ConsultationId, ErrorCode, NewActivity, NewConsultation,
    NewVaccination, NewVaccinationRecord, Pet, PetId, PetPatch, RecordType, Role, UserId,
    Vaccination, VaccinationRecord, VaccinationRecordId, VaccinationRecordPatch,
};
use crate::test_support::{Clinic, clinic_now, utc};

fn activity(pet_id: PetId, offset: Duration) -> NewActivity {
    NewActivity {
        activity_type: "paseo".into(),
        description: "Paseo por el parque".into(),
        date: clinic_now() + offset,
        pet_id,
    }
}

fn consultation(pet_id: PetId, offset: Duration) -> NewConsultation {
    NewConsultation {
        veterinarian: "Dra. López".into(),
        description: "Revisión anual".into(),
        date: clinic_now() + offset,
        pet_id,
    }
}

fn card(pet_id: PetId, record_type: RecordType) -> NewVaccinationRecord {
    NewVaccinationRecord {
        record_type,
        pet_id,
    }
}

#[tokio::test]
async fn non_admin_cannot_touch_another_owners_records() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let luis = clinic.user("luis@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;

    let err = clinic
        .pipeline
        .create::<Activity>(activity(pet.id, Duration::hours(1)), &luis)
        .await
        .expect_err("luis does not own the pet");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let created = clinic
        .pipeline
        .create::<Activity>(activity(pet.id, Duration::hours(1)), &ana)
        .await
        .expect("ana owns the pet")
        .into_payload();

    for result in [
        clinic.pipeline.read_one::<Activity>(created.id, &luis).await,
        clinic
            .pipeline
            .update::<Activity>(created.id, ActivityPatch::default(), &luis)
            .await,
        clinic.pipeline.delete::<Activity>(created.id, &luis).await,
    ] {
        assert_eq!(
            result.expect_err("foreign record").code(),
            ErrorCode::Forbidden
        );
    }
}

#[tokio::test]
async fn admin_may_act_on_any_record() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let admin = clinic.user("admin@clinic.mx", Role::Admin).await;
    let pet = clinic.pet(&ana, "Gato", utc(2024, 1, 1, 0, 0, 0)).await;

    let envelope = clinic
        .pipeline
        .create::<Activity>(activity(pet.id, Duration::zero()), &admin)
        .await
        .expect("admin is unrestricted");
    assert_eq!(envelope.message(), "activity created");
}

#[tokio::test]
async fn missing_pet_is_not_found_before_authorization() {
    let clinic = Clinic::new();
    let luis = clinic.user("luis@clinic.mx", Role::User).await;

    let err = clinic
        .pipeline
        .create::<Activity>(activity(PetId::new(404), Duration::hours(1)), &luis)
        .await
        .expect_err("unknown pet");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn read_one_reports_missing_ids_as_not_found_to_everyone() {
    let clinic = Clinic::new();
    let luis = clinic.user("luis@clinic.mx", Role::User).await;
    let err = clinic
        .pipeline
        .read_one::<Consultation>(ConsultationId::new(7), &luis)
        .await
        .expect_err("no such consultation");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Duration::seconds(-1), false)]
#[case(Duration::zero(), true)]
#[tokio::test]
async fn activity_date_must_not_be_past(#[case] offset: Duration, #[case] accepted: bool) {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;

    let result = clinic
        .pipeline
        .create::<Activity>(activity(pet.id, offset), &ana)
        .await;
    match result {
        Ok(_) => assert!(accepted),
        Err(err) => {
            assert!(!accepted);
            assert_eq!(err.code(), ErrorCode::InvalidRequest);
        }
    }
}

#[rstest]
#[case(Duration::zero(), false)]
#[case(Duration::seconds(1), true)]
#[tokio::test]
async fn consultation_date_must_be_strictly_future(
    #[case] offset: Duration,
    #[case] accepted: bool,
) {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;

    let result = clinic
        .pipeline
        .create::<Consultation>(consultation(pet.id, offset), &ana)
        .await;
    assert_eq!(result.is_ok(), accepted);
}

#[tokio::test]
async fn cachorro_card_is_rejected_for_a_thirteen_month_dog() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 5, 1, 0, 0, 0)).await;

    let err = clinic
        .pipeline
        .create::<VaccinationRecord>(card(pet.id, RecordType::Cachorro), &ana)
        .await
        .expect_err("too old for a puppy card");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let stored = RecordStore::<VaccinationRecord>::find_by(
        clinic.store.as_ref(),
        crate::domain::ports::RecordFilter::All,
    )
    .await
    .expect("list cards");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn second_card_of_the_same_type_conflicts() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Gato", utc(2024, 2, 1, 0, 0, 0)).await;

    clinic
        .pipeline
        .create::<VaccinationRecord>(card(pet.id, RecordType::Gatito), &ana)
        .await
        .expect("first kitten card");
    let err = clinic
        .pipeline
        .create::<VaccinationRecord>(card(pet.id, RecordType::Gatito), &ana)
        .await
        .expect_err("duplicate card");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn unrecognised_species_bypass_eligibility_but_not_storage_uniqueness() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Conejo", utc(2024, 2, 1, 0, 0, 0)).await;

    clinic
        .pipeline
        .create::<VaccinationRecord>(card(pet.id, RecordType::Adulto), &ana)
        .await
        .expect("no matrix for rabbits");
    let err = clinic
        .pipeline
        .create::<VaccinationRecord>(card(pet.id, RecordType::Adulto), &ana)
        .await
        .expect_err("store still enforces uniqueness");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn card_update_without_type_change_conflicts_with_itself() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2022, 1, 1, 0, 0, 0)).await;
    let created = clinic
        .pipeline
        .create::<VaccinationRecord>(card(pet.id, RecordType::Adulto), &ana)
        .await
        .expect("adult card")
        .into_payload();

    let patch = VaccinationRecordPatch {
        pet_id: Some(pet.id),
        ..VaccinationRecordPatch::default()
    };
    let err = clinic
        .pipeline
        .update::<VaccinationRecord>(created.id, patch, &ana)
        .await
        .expect_err("own card counts as existing");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(utc(2024, 6, 10, 0, 0, 0), true)]
#[case(utc(2024, 6, 10, 23, 59, 59), true)]
#[case(utc(2024, 6, 11, 0, 0, 0), false)]
#[case(utc(2024, 6, 9, 23, 59, 59), false)]
#[tokio::test]
async fn vaccination_must_be_applied_today(
    #[case] applied: chrono::DateTime<chrono::Utc>,
    #[case] accepted: bool,
) {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2024, 1, 1, 0, 0, 0)).await;
    let record = clinic
        .pipeline
        .create::<VaccinationRecord>(card(pet.id, RecordType::Cachorro), &ana)
        .await
        .expect("card")
        .into_payload();

    let draft = NewVaccination {
        name: "Rabia".into(),
        application_date: applied,
        weight: Decimal::new(12_345, 3),
        pet_id: pet.id,
        vaccination_record_id: record.id,
    };
    let result = clinic.pipeline.create::<Vaccination>(draft, &ana).await;
    match (accepted, result) {
        (true, Ok(envelope)) => {
            let stored = envelope.into_payload();
            assert_eq!(stored.application_date, utc(2024, 6, 10, 0, 0, 0));
            assert_eq!(stored.weight, Decimal::new(1_235, 2));
        }
        (false, Err(err)) => assert_eq!(err.code(), ErrorCode::InvalidRequest),
        (true, Err(err)) => panic!("expected success, got {err:?}"),
        (false, Ok(_)) => panic!("expected rejection"),
    }
}

#[tokio::test]
async fn vaccination_requires_an_existing_card() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2024, 1, 1, 0, 0, 0)).await;

    let draft = NewVaccination {
        name: "Rabia".into(),
        application_date: clinic_now(),
        weight: Decimal::new(5, 0),
        pet_id: pet.id,
        vaccination_record_id: VaccinationRecordId::new(77),
    };
    let err = clinic
        .pipeline
        .create::<Vaccination>(draft, &ana)
        .await
        .expect_err("missing card");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn empty_patch_changes_nothing_and_runs_no_rule() {
    // The consultation is now in the past, so re-running its date rule would fail.
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;
    let stale = RecordStore::<Consultation>::create(
        clinic.store.as_ref(),
        &consultation(pet.id, -Duration::days(3)),
    )
    .await
    .expect("seed stale consultation");

    let envelope = clinic
        .pipeline
        .update::<Consultation>(stale.id, Default::default(), &ana)
        .await
        .expect("empty patch succeeds");
    assert_eq!(envelope.message(), "consultation updated");
    assert_eq!(envelope.payload(), &stale);
}

#[tokio::test]
async fn update_reruns_only_rules_for_present_fields() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;
    let stale = RecordStore::<Activity>::create(
        clinic.store.as_ref(),
        &activity(pet.id, -Duration::days(1)),
    )
    .await
    .expect("seed past activity");

    let renamed = clinic
        .pipeline
        .update::<Activity>(
            stale.id,
            ActivityPatch {
                description: Some("Baño".into()),
                ..ActivityPatch::default()
            },
            &ana,
        )
        .await
        .expect("date untouched, rule not re-run")
        .into_payload();
    assert_eq!(renamed.description, "Baño");
    assert_eq!(renamed.date, stale.date);

    let err = clinic
        .pipeline
        .update::<Activity>(
            stale.id,
            ActivityPatch {
                date: Some(clinic_now() - Duration::minutes(1)),
                ..ActivityPatch::default()
            },
            &ana,
        )
        .await
        .expect_err("date present, rule re-run");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn moving_a_record_to_an_unknown_pet_is_not_found() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;
    let created = clinic
        .pipeline
        .create::<Activity>(activity(pet.id, Duration::hours(2)), &ana)
        .await
        .expect("activity")
        .into_payload();

    let err = clinic
        .pipeline
        .update::<Activity>(
            created.id,
            ActivityPatch {
                pet_id: Some(PetId::new(999)),
                ..ActivityPatch::default()
            },
            &ana,
        )
        .await
        .expect_err("unknown target pet");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn read_all_scopes_non_admins_to_their_own_pets() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let luis = clinic.user("luis@clinic.mx", Role::User).await;
    let admin = clinic.user("admin@clinic.mx", Role::Admin).await;
    let anas = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;
    let luiss = clinic.pet(&luis, "Gato", utc(2023, 6, 15, 0, 0, 0)).await;
    for (pet, owner) in [(&anas, &ana), (&luiss, &luis)] {
        clinic
            .pipeline
            .create::<Activity>(activity(pet.id, Duration::hours(1)), owner)
            .await
            .expect("activity");
    }

    let mine = clinic
        .pipeline
        .read_all::<Activity>(&ana)
        .await
        .expect("ana's activities")
        .into_payload();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].pet_id, anas.id);

    let everything = clinic
        .pipeline
        .read_all::<Activity>(&admin)
        .await
        .expect("all activities");
    assert_eq!(everything.payload().len(), 2);
    assert_eq!(everything.message(), "activities found");
}

#[tokio::test]
async fn pet_birth_date_cannot_be_in_the_future() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;

    let err = clinic
        .pipeline
        .update::<Pet>(
            pet.id,
            PetPatch {
                birth_date: Some(clinic_now() + Duration::days(1)),
                ..PetPatch::default()
            },
            &ana,
        )
        .await
        .expect_err("future birth date");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn pet_transfer_requires_an_existing_user() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;

    let err = clinic
        .pipeline
        .update::<Pet>(
            pet.id,
            PetPatch {
                owner_id: Some(UserId::new(404)),
                ..PetPatch::default()
            },
            &ana,
        )
        .await
        .expect_err("unknown new owner");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn deleting_a_pet_leaves_its_records() {
    let clinic = Clinic::new();
    let ana = clinic.user("ana@clinic.mx", Role::User).await;
    let pet = clinic.pet(&ana, "Perro", utc(2023, 6, 15, 0, 0, 0)).await;
    let created = clinic
        .pipeline
        .create::<Activity>(activity(pet.id, Duration::hours(1)), &ana)
        .await
        .expect("activity")
        .into_payload();

    let deleted = clinic
        .pipeline
        .delete::<Pet>(pet.id, &ana)
        .await
        .expect("owner deletes pet");
    assert_eq!(deleted.message(), "pet deleted");
    assert_eq!(deleted.payload(), &pet);

    let orphan = RecordStore::<Activity>::find_by_id(clinic.store.as_ref(), created.id)
        .await
        .expect("lookup");
    assert!(orphan.is_some());
}
