use domain::{
    AccessControlEntry, AccessControlList, AccessRights, AccessType, Trustee, TrusteeType,
    compare_acls, compare_acls_strict,
};

fn entry(
    trustee_type: TrusteeType,
    object_id: &str,
    access_type: AccessType,
    rights: AccessRights,
) -> AccessControlEntry {
    AccessControlEntry::new(
        Trustee::new(trustee_type, "tenant-1", object_id),
        access_type,
        rights,
    )
}

fn read_write_role(object_id: &str) -> AccessControlEntry {
    entry(
        TrusteeType::Role,
        object_id,
        AccessType::Allowed,
        AccessRights::READ | AccessRights::WRITE,
    )
}

fn samples() -> Vec<AccessControlList> {
    vec![
        AccessControlList::default(),
        AccessControlList::new(vec![read_write_role("role-1")]),
        AccessControlList::new(vec![
            read_write_role("role-1"),
            entry(TrusteeType::Role, "role-2", AccessType::Allowed, AccessRights::NONE),
        ]),
        AccessControlList::new(vec![
            entry(TrusteeType::Role, "role-2", AccessType::Allowed, AccessRights::NONE),
            read_write_role("role-1"),
        ]),
        AccessControlList::new(vec![
            entry(TrusteeType::User, "role-1", AccessType::Allowed, AccessRights::READ),
            entry(TrusteeType::Role, "role-1", AccessType::Denied, AccessRights::ALL),
        ]),
    ]
}

#[test]
fn compare_is_reflexive() {
    for acl in samples() {
        assert!(compare_acls(&acl, &acl));
        assert!(compare_acls(&acl, &acl.clone()));
    }
}

#[test]
fn compare_is_symmetric() {
    let samples = samples();
    for a in &samples {
        for b in &samples {
            assert_eq!(compare_acls(a, b), compare_acls(b, a));
        }
    }
}

#[test]
fn compare_rejects_different_lengths() {
    let samples = samples();
    for a in &samples {
        for b in &samples {
            if a.len() != b.len() {
                assert!(!compare_acls(a, b));
            }
        }
    }
}

#[test]
fn compare_ignores_order() {
    let samples = samples();
    assert!(compare_acls(&samples[2], &samples[3]));
}

#[test]
fn compare_same_single_entry() {
    let a = AccessControlList::new(vec![read_write_role("R1")]);
    let b = AccessControlList::new(vec![read_write_role("R1")]);
    assert!(compare_acls(&a, &b));
}

#[test]
fn compare_detects_rights_difference() {
    let a = AccessControlList::new(vec![read_write_role("R1")]);
    let b = AccessControlList::new(vec![entry(
        TrusteeType::Role,
        "R1",
        AccessType::Allowed,
        AccessRights::READ,
    )]);
    assert!(!compare_acls(&a, &b));
}

#[test]
fn compare_checks_every_field() {
    let base = read_write_role("R1");
    let variants = vec![
        AccessControlEntry::new(base.trustee.clone(), AccessType::Denied, base.access_rights),
        AccessControlEntry::new(
            Trustee::new(TrusteeType::User, "tenant-1", "R1"),
            AccessType::Allowed,
            base.access_rights,
        ),
        AccessControlEntry::new(
            Trustee::new(TrusteeType::Role, "tenant-2", "R1"),
            AccessType::Allowed,
            base.access_rights,
        ),
        AccessControlEntry::new(
            Trustee::new(TrusteeType::Role, "tenant-1", "R2"),
            AccessType::Allowed,
            base.access_rights,
        ),
    ];
    let expected = AccessControlList::new(vec![base]);
    for variant in variants {
        assert!(!compare_acls(&expected, &AccessControlList::new(vec![variant])));
    }
}

/// 重复条目可以重复匹配同一个目标条目：宽松比较因此不对称地接受它，严格比较拒绝。
#[test]
fn duplicate_entries_can_match_the_same_target() {
    let duplicated = AccessControlList::new(vec![read_write_role("R1"), read_write_role("R1")]);
    let mixed = AccessControlList::new(vec![read_write_role("R1"), read_write_role("R2")]);

    assert!(compare_acls(&duplicated, &mixed));
    assert!(!compare_acls(&mixed, &duplicated));

    assert!(!compare_acls_strict(&duplicated, &mixed));
    assert!(!compare_acls_strict(&mixed, &duplicated));
}

#[test]
fn acl_round_trips_service_json() {
    let body = r#"{
        "RoleTrusteeAccessControlEntries": [
            {
                "Trustee": { "Type": 3, "TenantId": "tenant-1", "ObjectId": "R1" },
                "AccessType": 0,
                "AccessRights": 3
            },
            {
                "Trustee": { "Type": "Role", "TenantId": "tenant-1", "ObjectId": "R2" },
                "AccessType": "Allowed",
                "AccessRights": 0
            }
        ]
    }"#;
    let acl: AccessControlList = serde_json::from_str(body).expect("acl");
    assert_eq!(acl.len(), 2);
    assert!(acl.contains(&read_write_role("R1")));

    let value = serde_json::to_value(&acl).expect("json");
    let first = &value["RoleTrusteeAccessControlEntries"][0];
    assert_eq!(first["AccessType"], "Allowed");
    assert_eq!(first["Trustee"]["Type"], "Role");
    assert_eq!(first["AccessRights"], 3);
}
