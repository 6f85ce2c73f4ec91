//! Development-only synthetic data.
//!
//! Nothing on the request path calls into this module; it is reachable from the CLI `seed`
//! command only. Every generated patient passes [`crate::validation`] and goes through
//! [`PatientService::create`], so the uniqueness rule applies to seeded rows as well.

use crate::{PatientError, PatientResult, PatientService};
use api_shared::{Gender, PatientDto};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

const LAST_NAMES: &[&str] = &[
    "Alaoui", "Bennani", "Cherkaoui", "Daoudi", "El Amrani", "Fassi", "Gharbi", "Hassani",
    "Idrissi", "Jabri", "Khalil", "Lahlou", "Mansouri", "Naciri", "Ouali", "Qadiri", "Rahmani",
    "Saidi", "Tazi", "Wahbi", "Yousfi", "Zahraoui",
];

const MALE_FIRST_NAMES: &[&str] = &[
    "Ahmed", "Mohammed", "Hassan", "Youssef", "Omar", "Karim", "Adil", "Bilal", "Tarik", "Samir",
    "Nabil", "Rachid", "Jamal", "Hicham",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Fatima", "Amina", "Khadija", "Zineb", "Sara", "Layla", "Nour", "Yasmin", "Hanae", "Salma",
    "Imane",
];

const STREETS: &[&str] = &[
    "Rue Mohammed V", "Avenue Hassan II", "Boulevard Mohammed VI", "Rue Al Qods",
    "Boulevard Zerktouni", "Rue Ibn Batouta", "Avenue Ibn Sina", "Boulevard Al Massira",
];

const CITIES: &[&str] = &[
    "Casablanca", "Rabat", "Fes", "Marrakech", "Agadir", "Tanger", "Meknes", "Oujda", "Kenitra",
    "Tetouan",
];

const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

const MEDICAL_HISTORIES: &[&str] = &[
    "Type 2 diabetes", "Hypertension", "Asthma", "Peanut allergy", "Appendectomy",
    "Fractured right arm", "None", "Chronic migraine", "Glaucoma", "Crohn's disease",
    "Lactose intolerance",
];

/// Insert `count` synthetic patients if, and only if, the store is empty.
///
/// # Returns
///
/// The number of patients inserted (zero when the store already held data). Generated national
/// ids that happen to collide are skipped rather than retried.
///
/// # Errors
///
/// Propagates any storage failure other than a duplicate national id.
pub fn seed_if_empty<R: Rng>(
    service: &PatientService,
    count: usize,
    rng: &mut R,
) -> PatientResult<usize> {
    let existing = service.count()?;
    if existing > 0 {
        tracing::info!(existing, "store already holds patients, skipping seed");
        return Ok(0);
    }

    tracing::info!(count, "seeding synthetic patients");

    let mut inserted = 0;
    for _ in 0..count {
        match service.create(&random_patient(rng)) {
            Ok(_) => inserted += 1,
            Err(PatientError::DuplicateNationalId) => {
                tracing::warn!("generated national id already used, skipping");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(inserted, "seeding finished");
    Ok(inserted)
}

/// Build one random, valid patient.
pub fn random_patient<R: Rng>(rng: &mut R) -> PatientDto {
    let gender = if rng.gen_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    };

    let last_name = pick(rng, LAST_NAMES);
    let first_name = match gender {
        Gender::Male => pick(rng, MALE_FIRST_NAMES),
        _ => pick(rng, FEMALE_FIRST_NAMES),
    };

    let year = rng.gen_range(1950..2005);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    let birth_date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();

    let address = format!(
        "{} {}, {:05} {}",
        rng.gen_range(1..=100),
        pick(rng, STREETS),
        rng.gen_range(10_000..100_000),
        pick(rng, CITIES),
    );

    let email = format!(
        "{}.{}@gmail.com",
        first_name.to_lowercase(),
        last_name.to_lowercase().replace(' ', "")
    );

    let phone = format!("0{}{}", rng.gen_range(6..=7), random_digits(rng, 8));

    let national_id = format!(
        "{}{:02}{:02}{:02}{}",
        if gender == Gender::Male { 1 } else { 2 },
        year % 100,
        month,
        rng.gen_range(1..=95),
        random_digits(rng, 8),
    );

    PatientDto {
        id: None,
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        birth_date,
        phone: Some(phone),
        address,
        email: Some(email),
        gender,
        medical_history: Some(pick(rng, MEDICAL_HISTORIES).to_string()),
        national_id: Some(national_id),
        blood_group: Some(pick(rng, BLOOD_GROUPS).to_string()),
        created_at: None,
        updated_at: None,
    }
}

fn pick<R: Rng>(rng: &mut R, values: &[&'static str]) -> &'static str {
    values.choose(rng).copied().unwrap_or_default()
}

fn random_digits<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_patient;
    use api_shared::PatientPayload;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_patients_pass_validation() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = chrono::Local::now().date_naive();

        for _ in 0..200 {
            let dto = random_patient(&mut rng);
            let payload = PatientPayload::from(&dto);
            assert!(
                validate_patient(&payload, today).is_ok(),
                "invalid seed patient: {dto:?}"
            );
        }
    }

    #[test]
    fn seeds_only_an_empty_store() {
        let service = PatientService::in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let inserted = seed_if_empty(&service, 20, &mut rng).unwrap();
        assert!(inserted > 0 && inserted <= 20);
        assert_eq!(service.count().unwrap(), inserted);

        assert_eq!(seed_if_empty(&service, 20, &mut rng).unwrap(), 0);
        assert_eq!(service.count().unwrap(), inserted);
    }
}
