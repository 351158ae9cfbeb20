use chrono::{Duration, Utc};
use proptest::prelude::*;
use rolo_clients::rules::normalize_name;
use rolo_clients::{
    ClientCandidate, ClientId, ClientRecord, Field, ListView, RuleSet, ViolationKind,
};

fn records(count: usize) -> Vec<ClientRecord> {
    let now = Utc::now();
    (0..count)
        .map(|i| ClientRecord {
            id: ClientId::generate(),
            name: format!("Client {i}"),
            email: format!("client{i}@example.com"),
            phone: None,
            created_at: now - Duration::seconds(i64::try_from(i).unwrap_or(i64::MAX)),
        })
        .collect()
}

proptest! {
    #[test]
    fn stuttering_names_fail_quality(prefix in "[a-z]{1,5}", letter in "[a-z]", run in 4usize..8) {
        let name = format!("{prefix} {}", letter.repeat(run));
        let violation = RuleSet::standard().validate_field(Field::Name, &name).unwrap_err();
        prop_assert_eq!(violation.kind, ViolationKind::Quality);
    }

    #[test]
    fn normalized_names_are_idempotent(raw in "[A-Za-z ]{0,30}") {
        let once = normalize_name(&raw);
        prop_assert_eq!(normalize_name(&once), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn well_formed_emails_pass(
        local in "[a-z0-9]{1,12}",
        domain in "[a-z]{1,12}",
        tld in "[a-z]{2,6}",
    ) {
        let email = format!("{local}@{domain}.{tld}");
        prop_assert!(RuleSet::standard().validate_field(Field::Email, &email).is_ok());
    }

    #[test]
    fn emails_without_at_fail(raw in "[a-z0-9.]{1,30}") {
        let violation = RuleSet::standard().validate_field(Field::Email, &raw).unwrap_err();
        prop_assert_eq!(violation.kind, ViolationKind::Format);
    }

    #[test]
    fn short_phones_fail(raw in "[a-z0-9+()./ -]{1,7}") {
        prop_assume!(!raw.trim().is_empty());
        for rules in [RuleSet::standard(), RuleSet::strict()] {
            let violation = rules.validate_field(Field::Phone, &raw).unwrap_err();
            prop_assert_eq!(violation.kind, ViolationKind::Length);
        }
    }

    #[test]
    fn strict_phones_reject_non_digits(
        head in "[0-9]{4,8}",
        junk in "[a-z+()./ -]",
        tail in "[0-9]{4,8}",
    ) {
        let phone = format!("{head}{junk}{tail}");
        let violation = RuleSet::strict().validate_field(Field::Phone, &phone).unwrap_err();
        prop_assert_eq!(violation.kind, ViolationKind::Format);
    }

    #[test]
    fn permissive_phones_reject_letters(
        head in "[0-9]{4,8}",
        letter in "[a-z]",
        tail in "[0-9]{4,8}",
    ) {
        let phone = format!("{head}{letter}{tail}");
        let violation = RuleSet::standard().validate_field(Field::Phone, &phone).unwrap_err();
        prop_assert_eq!(violation.kind, ViolationKind::Format);
    }

    #[test]
    fn blank_phones_pass(spaces in " {0,6}") {
        let candidate = ClientCandidate::new("Ana Pérez", "ana@x.com").with_phone(spaces);
        let client = RuleSet::standard().validate(&candidate).unwrap();
        prop_assert!(client.phone().is_none());
    }

    #[test]
    fn pages_are_clamped(total in 0usize..60, page_size in 1usize..15, requested in 0usize..100) {
        let mut view = ListView::new(page_size);
        view.replace(records(total));

        let pages = total.div_ceil(page_size);
        prop_assert_eq!(view.total_pages(), pages);

        let page = view.set_page(requested);
        prop_assert_eq!(page, requested.clamp(1, pages.max(1)));
        prop_assert!(view.page().len() <= page_size);
        if total > 0 {
            prop_assert!(!view.page().is_empty());
        }
    }

    #[test]
    fn search_ignores_case(total in 1usize..30, pick in 0usize..30) {
        let mut view = ListView::new(10);
        let all = records(total);
        let target = all[pick % total].email.clone();
        view.replace(all);

        let hits = view.search(&target.to_uppercase());
        prop_assert!(hits.iter().any(|r| r.email == target));
        prop_assert_eq!(view.search("   ").len(), total);
    }
}
