//! End-to-end scenarios: a YAML policy document through resolution to
//! runtime permission checks.

use rolegate_core::{Client, OrganizationPolicy, PolicyDeclaration, PolicyModel};

const GENERAL_POLICY: &str = r#"
metadata:
  name: general
permissions:
  - metadata:
      label: user
    resources:
      - label: user.read_basic
      - label: user.read_all
    rules:
      - when: user.read_all
        then: [user.read_basic]
  - metadata:
      label: book
    resources:
      - label: book.list
      - label: book.read
      - label: book.sell
    rules:
      - when: book.read
        then: [book.list]
organizations:
  - metadata:
      label: acme
    permissions:
      - label: acme.user.read_all
  - metadata:
      label: other
    permissions:
      - type: allow
        label: other.book.sell
      - type: deny
        label: other.book.sell
roles:
  - metadata:
      label: client
      organization: acme
    permissions:
      - label: acme.user.read_basic
  - metadata:
      label: seller
      organization: other
    permissions:
      - label: other.book.read
"#;

fn general_model() -> PolicyModel {
    let declaration: PolicyDeclaration = serde_yaml::from_str(GENERAL_POLICY).unwrap();
    PolicyModel::resolve(declaration).unwrap()
}

#[test]
fn test_organization_grant_expands_through_rules() {
    let model = general_model();
    let mut client = Client::new();
    client.add_organization("acme", Some(&model)).unwrap();

    assert_eq!(model.check("acme.user.read_all", &client), Ok(true));
    // Implied by the user.read_all -> user.read_basic rule.
    assert_eq!(model.check("acme.user.read_basic", &client), Ok(true));
    // Not granted and not implied.
    assert_eq!(model.check("acme.book.list", &client), Ok(false));
}

#[test]
fn test_not_joined_organization_grants_nothing() {
    let model = general_model();
    let mut client = Client::new();
    client.add_organization("acme", Some(&model)).unwrap();

    assert_eq!(model.check("other.book.list", &client), Ok(false));
    assert_eq!(model.check("other.user.read_basic", &client), Ok(false));
}

#[test]
fn test_no_reverse_implication() {
    // acme.client holds only user.read_basic; the implication rule goes the
    // other way, so read_all must stay out of reach.
    let declaration: PolicyDeclaration = serde_yaml::from_str(
        r#"
metadata:
  name: reverse
permissions:
  - metadata:
      label: user
    resources:
      - label: user.read_basic
      - label: user.read_all
    rules:
      - when: user.read_all
        then: [user.read_basic]
organizations:
  - metadata:
      label: acme
roles:
  - metadata:
      label: client
      organization: acme
    permissions:
      - label: acme.user.read_basic
"#,
    )
    .unwrap();
    let model = PolicyModel::resolve(declaration).unwrap();

    let mut client = Client::new();
    client
        .add_role("acme.client", Some(&model), OrganizationPolicy::AutoAdd)
        .unwrap();
    assert_eq!(model.check("acme.user.read_basic", &client), Ok(true));
    assert_eq!(model.check("acme.user.read_all", &client), Ok(false));
    assert_eq!(model.check("acme.user.all", &client), Ok(false));
}

#[test]
fn test_synthetic_all_resource_is_checkable() {
    let model = general_model();
    let mut client = Client::new();
    client
        .add_role("acme.root", Some(&model), OrganizationPolicy::AutoAdd)
        .unwrap();
    assert_eq!(model.check("acme.user.all", &client), Ok(true));
    assert_eq!(model.check("acme.book.all", &client), Ok(true));
}

#[test]
fn test_granting_all_implies_every_resource_in_group() {
    let declaration: PolicyDeclaration = serde_yaml::from_str(
        r#"
metadata:
  name: all_grant
permissions:
  - metadata:
      label: book
    resources:
      - label: book.list
      - label: book.read
organizations:
  - metadata:
      label: acme
    permissions:
      - label: acme.book.all
"#,
    )
    .unwrap();
    let model = PolicyModel::resolve(declaration).unwrap();
    let mut client = Client::new();
    client.add_organization("acme", Some(&model)).unwrap();

    assert_eq!(model.check("acme.book.all", &client), Ok(true));
    assert_eq!(model.check("acme.book.list", &client), Ok(true));
    assert_eq!(model.check("acme.book.read", &client), Ok(true));
}

#[test]
fn test_deny_wins_over_allow_on_same_label() {
    let model = general_model();
    let mut client = Client::new();
    client.add_organization("other", Some(&model)).unwrap();

    // other grants allow+deny on book.sell: the deny subtracts it, but the
    // expansion of the allow through book rules never ran from sell.
    assert_eq!(model.check("other.book.sell", &client), Ok(false));
}

#[test]
fn test_root_role_is_universal() {
    let model = general_model();
    for organization in ["acme", "other"] {
        let mut client = Client::new();
        client
            .add_role(
                &format!("{organization}.root"),
                Some(&model),
                OrganizationPolicy::AutoAdd,
            )
            .unwrap();
        for permission in [
            "user.read_basic",
            "user.read_all",
            "user.all",
            "book.list",
            "book.read",
            "book.sell",
            "book.all",
        ] {
            assert_eq!(
                model.check(&format!("{organization}.{permission}"), &client),
                Ok(true),
                "{organization}.root must hold {permission}"
            );
        }
    }
}

#[test]
fn test_resolution_is_deterministic_for_equal_input() {
    let declaration: PolicyDeclaration = serde_yaml::from_str(GENERAL_POLICY).unwrap();
    let first = PolicyModel::resolve(declaration.clone()).unwrap();
    let second = PolicyModel::resolve(declaration).unwrap();

    assert_eq!(first.permission_to_role(), second.permission_to_role());
    assert_eq!(
        first.permission_to_organization(),
        second.permission_to_organization()
    );
    assert_eq!(first.orgs(), second.orgs());
    assert_eq!(first.role_labels(), second.role_labels());
    assert_eq!(first.perms(), second.perms());
}

#[test]
fn test_invalid_documents_fail_resolution() {
    for (name, document) in [
        (
            "dangling grant",
            r#"
metadata: {name: bad}
permissions:
  - metadata: {label: user}
    resources: [{label: user.read}]
organizations:
  - metadata: {label: acme}
    permissions: [{label: acme.user.write}]
"#,
        ),
        (
            "declared root role",
            r#"
metadata: {name: bad}
organizations:
  - metadata: {label: acme}
roles:
  - metadata: {label: root, organization: acme}
"#,
        ),
        (
            "declared all resource",
            r#"
metadata: {name: bad}
permissions:
  - metadata: {label: user}
    resources: [{label: user.all}]
"#,
        ),
    ] {
        let declaration: PolicyDeclaration = serde_yaml::from_str(document).unwrap();
        assert!(
            PolicyModel::resolve(declaration).is_err(),
            "{name} must fail resolution"
        );
    }
}

#[test]
fn test_uppercase_labels_fail_at_deserialization() {
    let result: Result<PolicyDeclaration, _> = serde_yaml::from_str(
        r#"
metadata: {name: bad}
organizations:
  - metadata: {label: ACME}
"#,
    );
    assert!(result.is_err());
}
