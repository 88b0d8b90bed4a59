//! End-to-end query evaluation tests: FetchXML in, entity collections out.

use chrono::{Duration, TimeZone, Utc};
use fauxcrm_eval::{QueryEngine, QueryError};
use fauxcrm_metadata::{EntityMetadata, MetadataRegistry};
use fauxcrm_store::RecordStore;
use fauxcrm_types::{
    AttributeValue, Entity, EntityCollection, EntityReference, Money, OptionSetValue,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use uuid::Uuid;

const ANN: Uuid = Uuid::from_u128(0xA1);
const BOB: Uuid = Uuid::from_u128(0xB2);
const CID: Uuid = Uuid::from_u128(0xC3);
const CALLER: Uuid = Uuid::from_u128(0xCA11);
const OTHER: Uuid = Uuid::from_u128(0x07);

const E_ANN_OPEN: Uuid = Uuid::from_u128(0x11);
const E_ANN_ENDED: Uuid = Uuid::from_u128(0x12);
const E_BOB_OPEN: Uuid = Uuid::from_u128(0x13);

const ACME: Uuid = Uuid::from_u128(0xAC);
const GLOBEX: Uuid = Uuid::from_u128(0x61);

fn schema() -> MetadataRegistry {
    use fauxcrm_types::AttributeTypeCode as T;

    let registry = MetadataRegistry::new();

    let mut person = EntityMetadata::new("person")
        .attribute("firstname", T::String)
        .unwrap()
        .attribute("nickname", T::String)
        .unwrap()
        .attribute("age", T::Integer)
        .unwrap()
        .attribute("status", T::Picklist)
        .unwrap()
        .attribute("remote", T::Boolean)
        .unwrap()
        .attribute("ownerid", T::Owner)
        .unwrap();
    person.set_option_labels(
        "status",
        [(1, "Active".to_string()), (2, "Inactive".to_string())],
    );
    registry.register(person);

    registry.register(
        EntityMetadata::new("employment")
            .attribute("personid", T::Lookup)
            .unwrap()
            .attribute("companyid", T::Lookup)
            .unwrap()
            .attribute("role", T::String)
            .unwrap()
            .attribute("enddate", T::DateTime)
            .unwrap(),
    );

    registry.register(
        EntityMetadata::new("paycheck")
            .attribute("employmentid", T::Lookup)
            .unwrap()
            .attribute("amount", T::Money)
            .unwrap()
            .attribute("paidon", T::DateTime)
            .unwrap(),
    );

    registry.register(
        EntityMetadata::new("company")
            .attribute("name", T::String)
            .unwrap()
            .with_primary_name("name"),
    );

    registry
}

/// Three people, Ann with two employments (one ended three days ago), Bob
/// with one, Cid with none; paychecks hang off the employments.
fn engine() -> QueryEngine {
    let store = RecordStore::new();

    store
        .create(
            Entity::with_id("person", ANN)
                .with("firstname", AttributeValue::String("Ann".into()))
                .with("nickname", AttributeValue::String("Ann".into()))
                .with("age", AttributeValue::Integer(34))
                .with("status", AttributeValue::OptionSet(OptionSetValue(1)))
                .with("remote", AttributeValue::Boolean(true))
                .with(
                    "ownerid",
                    AttributeValue::Reference(EntityReference::new("systemuser", CALLER)),
                ),
        )
        .unwrap();
    store
        .create(
            Entity::with_id("person", BOB)
                .with("firstname", AttributeValue::String("Bob".into()))
                .with("nickname", AttributeValue::String("Bobby".into()))
                .with("age", AttributeValue::Integer(28))
                .with("status", AttributeValue::OptionSet(OptionSetValue(2)))
                .with(
                    "ownerid",
                    AttributeValue::Reference(EntityReference::new("systemuser", OTHER)),
                ),
        )
        .unwrap();
    store
        .create(
            Entity::with_id("person", CID)
                .with("firstname", AttributeValue::String("Cidro".into())),
        )
        .unwrap();

    let person_ref = |id| AttributeValue::Reference(EntityReference::new("person", id));
    let company_ref = |id| AttributeValue::Reference(EntityReference::new("company", id));
    store
        .create(
            Entity::with_id("employment", E_ANN_OPEN)
                .with(
                    "personid",
                    AttributeValue::Reference(
                        EntityReference::new("person", ANN).with_name("Ann"),
                    ),
                )
                .with("companyid", company_ref(ACME))
                .with("role", AttributeValue::String("engineer".into())),
        )
        .unwrap();
    store
        .create(
            Entity::with_id("employment", E_ANN_ENDED)
                .with("personid", person_ref(ANN))
                .with("companyid", company_ref(GLOBEX))
                .with("role", AttributeValue::String("consultant".into()))
                .with(
                    "enddate",
                    AttributeValue::DateTime(Utc::now() - Duration::days(3)),
                ),
        )
        .unwrap();
    store
        .create(
            Entity::with_id("employment", E_BOB_OPEN)
                .with("personid", person_ref(BOB))
                .with("companyid", company_ref(ACME))
                .with("role", AttributeValue::String("manager".into())),
        )
        .unwrap();

    let employment_ref =
        |id| AttributeValue::Reference(EntityReference::new("employment", id));
    let money = |n: i64| AttributeValue::Money(Money::new(Decimal::from(n)));
    let paid = |y, m, d| {
        AttributeValue::DateTime(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    };
    let checks = [
        (E_ANN_OPEN, 100, paid(2024, 5, 10)),
        (E_ANN_OPEN, 200, paid(2024, 6, 1)),
        (E_ANN_ENDED, 300, paid(2024, 6, 15)),
        (E_BOB_OPEN, 150, paid(2024, 7, 1)),
        (E_BOB_OPEN, 250, paid(2024, 7, 15)),
    ];
    for (employment, amount, paidon) in checks {
        store
            .create(
                Entity::new("paycheck")
                    .with("employmentid", employment_ref(employment))
                    .with("amount", money(amount))
                    .with("paidon", paidon),
            )
            .unwrap();
    }

    store
        .create(
            Entity::with_id("company", ACME)
                .with("name", AttributeValue::String("Acme".into())),
        )
        .unwrap();
    store
        .create(
            Entity::with_id("company", GLOBEX)
                .with("name", AttributeValue::String("Globex".into())),
        )
        .unwrap();

    QueryEngine::new(store, schema()).with_caller_id(CALLER)
}

fn run(engine: &QueryEngine, xml: &str) -> EntityCollection {
    engine.execute_fetch(xml).expect("query should succeed")
}

fn strings(collection: &EntityCollection, key: &str) -> Vec<String> {
    collection
        .entities
        .iter()
        .filter_map(|row| {
            row.get(key)
                .map(AttributeValue::unaliased)
                .and_then(AttributeValue::as_str)
                .map(str::to_owned)
        })
        .collect()
}

fn value_of(row: &Entity, key: &str) -> Option<AttributeValue> {
    row.get(key).map(AttributeValue::unaliased).cloned()
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn redundant_and_nesting_never_changes_a_match() {
    let engine = engine();
    let flat = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <filter><condition attribute="age" operator="gt" value="30" /></filter>
           </entity></fetch>"#,
    );
    let nested = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <filter>
               <filter>
                 <filter><condition attribute="age" operator="gt" value="30" /></filter>
               </filter>
             </filter>
           </entity></fetch>"#,
    );
    assert_eq!(strings(&flat, "firstname"), vec!["Ann"]);
    assert_eq!(strings(&flat, "firstname"), strings(&nested, "firstname"));
}

#[test]
fn or_filter_matches_either_arm() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <filter type="or">
               <condition attribute="age" operator="gt" value="30" />
               <condition attribute="firstname" operator="eq" value="Bob" />
             </filter>
             <order attribute="firstname" />
           </entity></fetch>"#,
    );
    assert_eq!(strings(&result, "firstname"), vec!["Ann", "Bob"]);
}

#[test]
fn null_test_nested_two_filters_deep_inside_link_criteria() {
    // The link's criteria constrain which employments may join: only open
    // ones. Everyone still comes back through the outer join; only people
    // with an open employment carry a role.
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <link-entity name="employment" from="personid" to="personid"
                          alias="emp" link-type="outer">
               <attribute name="role" />
               <filter>
                 <filter>
                   <condition attribute="enddate" operator="null" />
                 </filter>
               </filter>
             </link-entity>
             <order attribute="firstname" />
           </entity></fetch>"#,
    );

    assert_eq!(strings(&result, "firstname"), vec!["Ann", "Bob", "Cidro"]);
    let roles: Vec<Option<AttributeValue>> = result
        .entities
        .iter()
        .map(|row| value_of(row, "emp.role"))
        .collect();
    assert_eq!(
        roles,
        vec![
            Some(AttributeValue::String("engineer".into())),
            Some(AttributeValue::String("manager".into())),
            None,
        ]
    );
}

#[test]
fn conditions_can_address_links_by_dotted_alias() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <link-entity name="employment" from="personid" to="personid" alias="emp">
               <link-entity name="company" from="companyid" to="companyid" alias="comp" />
             </link-entity>
             <filter><condition attribute="comp.name" operator="eq" value="Globex" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(strings(&result, "firstname"), vec!["Ann"]);
}

#[test]
fn valueof_compares_two_columns_of_the_row() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <filter><condition attribute="firstname" operator="eq" valueof="nickname" /></filter>
           </entity></fetch>"#,
    );
    // Cid has no nickname at all; a column comparison with an absent
    // counterpart never matches.
    assert_eq!(strings(&result, "firstname"), vec!["Ann"]);
}

#[test]
fn caller_relative_operators_compare_record_ids() {
    let engine = engine();
    let mine = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <filter><condition attribute="ownerid" operator="eq-userid" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(strings(&mine, "firstname"), vec!["Ann"]);

    // An absent owner matches neither side of the test.
    let not_mine = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <filter><condition attribute="ownerid" operator="ne-userid" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(strings(&not_mine, "firstname"), vec!["Bob"]);
}

#[test]
fn lookup_conditions_match_references_by_record_id() {
    let engine = engine();
    let result = run(
        &engine,
        &format!(
            r#"<fetch><entity name="employment">
                 <attribute name="role" />
                 <filter><condition attribute="personid" operator="eq" value="{ANN}" /></filter>
                 <order attribute="role" />
               </entity></fetch>"#
        ),
    );
    assert_eq!(strings(&result, "role"), vec!["consultant", "engineer"]);
}

// ============================================================================
// String and date operators
// ============================================================================

#[test]
fn edge_wildcard_like_patterns_behave_as_their_string_operators() {
    let engine = engine();
    let pairs = [
        ("like", "%ng%", "contains", "ng"),
        ("like", "eng%", "begins-with", "eng"),
        ("like", "%ant", "ends-with", "ant"),
        ("not-like", "%ng%", "does-not-contain", "ng"),
    ];
    for (like_op, pattern, string_op, needle) in pairs {
        let via_like = run(
            &engine,
            &format!(
                r#"<fetch><entity name="employment">
                     <attribute name="role" />
                     <filter><condition attribute="role" operator="{like_op}" value="{pattern}" /></filter>
                     <order attribute="role" />
                   </entity></fetch>"#
            ),
        );
        let via_string = run(
            &engine,
            &format!(
                r#"<fetch><entity name="employment">
                     <attribute name="role" />
                     <filter><condition attribute="role" operator="{string_op}" value="{needle}" /></filter>
                     <order attribute="role" />
                   </entity></fetch>"#
            ),
        );
        assert_eq!(
            strings(&via_like, "role"),
            strings(&via_string, "role"),
            "{like_op} '{pattern}' vs {string_op} '{needle}'",
        );
    }
}

#[test]
fn interior_wildcards_go_through_the_like_matcher() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="employment">
             <attribute name="role" />
             <filter><condition attribute="role" operator="like" value="eng_neer" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(strings(&result, "role"), vec!["engineer"]);
}

#[test]
fn last_x_days_window_is_anchored_at_evaluation_time() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="employment">
             <attribute name="role" />
             <filter><condition attribute="enddate" operator="last-x-days" value="7" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(strings(&result, "role"), vec!["consultant"]);

    let outside = run(
        &engine,
        r#"<fetch><entity name="employment">
             <attribute name="role" />
             <filter><condition attribute="enddate" operator="last-x-days" value="2" /></filter>
           </entity></fetch>"#,
    );
    assert!(outside.entities.is_empty());
}

#[test]
fn on_compares_at_day_granularity() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="paycheck">
             <attribute name="amount" />
             <filter><condition attribute="paidon" operator="on" value="2024-05-10" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(result.entities.len(), 1);
    assert_eq!(
        value_of(&result.entities[0], "amount"),
        Some(AttributeValue::Money(Money::new(Decimal::from(100))))
    );
}

// ============================================================================
// Joins and aggregation
// ============================================================================

#[test]
fn nested_links_project_under_the_dotted_alias_path() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <filter><condition attribute="firstname" operator="eq" value="Ann" /></filter>
             <link-entity name="employment" from="personid" to="personid" alias="emp">
               <link-entity name="company" from="companyid" to="companyid" alias="comp">
                 <attribute name="name" />
               </link-entity>
             </link-entity>
             <order attribute="emp.comp.name" />
           </entity></fetch>"#,
    );
    assert_eq!(strings(&result, "emp.comp.name"), vec!["Acme", "Globex"]);
}

#[test]
fn count_spans_nested_outer_joins_and_reports_empty_groups_as_zero() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch aggregate="true"><entity name="person">
             <attribute name="firstname" groupby="true" alias="name" />
             <link-entity name="employment" from="personid" to="personid"
                          alias="emp" link-type="outer">
               <link-entity name="paycheck" from="employmentid" to="employmentid"
                            alias="pay" link-type="outer">
                 <attribute name="amount" aggregate="count" alias="total" />
               </link-entity>
             </link-entity>
             <order attribute="name" />
           </entity></fetch>"#,
    );

    assert_eq!(strings(&result, "name"), vec!["Ann", "Bob", "Cidro"]);
    let totals: Vec<Option<AttributeValue>> = result
        .entities
        .iter()
        .map(|row| value_of(row, "total"))
        .collect();
    assert_eq!(
        totals,
        vec![
            Some(AttributeValue::Integer(3)),
            Some(AttributeValue::Integer(2)),
            Some(AttributeValue::Integer(0)),
        ]
    );
}

#[test]
fn sum_preserves_money_and_skips_groups_with_no_values() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch aggregate="true"><entity name="person">
             <attribute name="firstname" groupby="true" alias="name" />
             <link-entity name="employment" from="personid" to="personid"
                          alias="emp" link-type="outer">
               <link-entity name="paycheck" from="employmentid" to="employmentid"
                            alias="pay" link-type="outer">
                 <attribute name="amount" aggregate="sum" alias="paid" />
               </link-entity>
             </link-entity>
             <order attribute="paid" descending="true" />
           </entity></fetch>"#,
    );

    assert_eq!(strings(&result, "name"), vec!["Ann", "Bob", "Cidro"]);
    assert_eq!(
        value_of(&result.entities[0], "paid"),
        Some(AttributeValue::Money(Money::new(Decimal::from(600))))
    );
    assert_eq!(
        value_of(&result.entities[1], "paid"),
        Some(AttributeValue::Money(Money::new(Decimal::from(400))))
    );
    assert_eq!(value_of(&result.entities[2], "paid"), None);
}

// ============================================================================
// Ordering, paging, distinct
// ============================================================================

#[test]
fn absent_values_sort_first_ascending() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <order attribute="age" />
           </entity></fetch>"#,
    );
    assert_eq!(strings(&result, "firstname"), vec!["Cidro", "Bob", "Ann"]);
}

#[test]
fn top_applies_after_the_total_count_is_taken() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch top="2" returntotalrecordcount="true"><entity name="person">
             <attribute name="firstname" />
             <order attribute="firstname" />
           </entity></fetch>"#,
    );
    assert_eq!(strings(&result, "firstname"), vec!["Ann", "Bob"]);
    assert_eq!(result.total_record_count, Some(3));
}

#[test]
fn paging_slices_the_ordered_result() {
    let engine = engine();
    let page2 = run(
        &engine,
        r#"<fetch page="2" count="1"><entity name="person">
             <attribute name="firstname" />
             <order attribute="firstname" />
           </entity></fetch>"#,
    );
    assert_eq!(strings(&page2, "firstname"), vec!["Bob"]);

    let beyond = run(
        &engine,
        r#"<fetch page="9" count="2"><entity name="person">
             <attribute name="firstname" />
           </entity></fetch>"#,
    );
    assert!(beyond.entities.is_empty());
}

#[test]
fn distinct_collapses_attribute_identical_rows() {
    let store = RecordStore::new();
    for label in ["alpha", "beta", "alpha"] {
        store
            .create(Entity::new("tag").with("label", AttributeValue::String(label.into())))
            .unwrap();
    }
    let engine = QueryEngine::new(store, MetadataRegistry::new());

    let result = run(
        &engine,
        r#"<fetch distinct="true"><entity name="tag">
             <attribute name="label" />
             <order attribute="label" />
           </entity></fetch>"#,
    );
    assert_eq!(strings(&result, "label"), vec!["alpha", "beta"]);
}

// ============================================================================
// Projection and formatted values
// ============================================================================

#[test]
fn all_attributes_projection_never_fails_and_never_emits_nulls() {
    let engine = engine();
    // Stray data the schema does not know about must not break anything.
    engine
        .store()
        .update(
            &Entity::with_id("person", CID).with("legacy", AttributeValue::Integer(9)),
            fauxcrm_store::VersionGuard::Any,
        )
        .unwrap();

    let result = run(
        &engine,
        r#"<fetch><entity name="person"><all-attributes />
             <order attribute="firstname" />
           </entity></fetch>"#,
    );
    assert_eq!(result.entities.len(), 3);
    let cid = &result.entities[2];
    assert_eq!(value_of(cid, "firstname"), Some(AttributeValue::String("Cidro".into())));
    assert!(!cid.contains("age"));
    assert!(cid.attributes().all(|(_, v)| !matches!(v, AttributeValue::Aliased(_))));
}

#[test]
fn explicit_projection_of_an_unknown_attribute_is_an_error() {
    let engine = engine();
    let err = engine
        .execute_fetch(
            r#"<fetch><entity name="person"><attribute name="shoesize" /></entity></fetch>"#,
        )
        .unwrap_err();
    assert!(matches!(
        &err,
        QueryError::UnknownAttribute { entity, attribute }
            if entity == "person" && attribute == "shoesize"
    ));
    assert_eq!(
        err.to_string(),
        "the attribute 'shoesize' does not exist on entity 'person'"
    );
}

#[test]
fn conditions_on_unknown_attributes_are_errors_only_for_registered_entities() {
    let engine = engine();
    let err = engine
        .execute_fetch(
            r#"<fetch><entity name="person">
                 <filter><condition attribute="shoesize" operator="eq" value="9" /></filter>
               </entity></fetch>"#,
        )
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownAttribute { .. }));

    // Without a registered schema the engine runs lax: the attribute is
    // simply absent, and only a null test matches it.
    let lax = QueryEngine::new(engine.store().clone(), MetadataRegistry::new());
    let result = run(
        &lax,
        r#"<fetch><entity name="person">
             <attribute name="firstname" />
             <filter><condition attribute="shoesize" operator="null" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(result.entities.len(), 3);
}

#[test]
fn unknown_condition_attributes_error_even_with_no_rows() {
    // Condition targets are validated before any row is touched, so an
    // empty store does not mask the defect.
    let empty = QueryEngine::new(RecordStore::new(), schema());
    let err = empty
        .execute_fetch(
            r#"<fetch><entity name="person">
                 <filter><condition attribute="shoesize" operator="eq" value="9" /></filter>
               </entity></fetch>"#,
        )
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownAttribute { .. }));

    // Same inside link criteria, where the joined row set is also empty.
    let err = empty
        .execute_fetch(
            r#"<fetch><entity name="person">
                 <link-entity name="employment" from="personid" to="personid" alias="emp">
                   <filter><condition attribute="badgecolor" operator="null" /></filter>
                 </link-entity>
               </entity></fetch>"#,
        )
        .unwrap_err();
    match err {
        QueryError::UnknownAttribute { entity, attribute } => {
            assert_eq!(entity, "employment");
            assert_eq!(attribute, "badgecolor");
        }
        other => panic!("expected UnknownAttribute, got {other:?}"),
    }
}

#[test]
fn schema_changes_take_effect_on_the_next_query() {
    let engine = engine();
    run(
        &engine,
        r#"<fetch><entity name="person"><attribute name="age" /></entity></fetch>"#,
    );

    assert!(engine.metadata().remove_attribute("person", "age"));
    let err = engine
        .execute_fetch(
            r#"<fetch><entity name="person"><attribute name="age" /></entity></fetch>"#,
        )
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownAttribute { .. }));
}

#[test]
fn formatted_values_carry_labels_and_display_strings() {
    let engine = engine();
    let result = run(
        &engine,
        r#"<fetch><entity name="person"><all-attributes />
             <filter><condition attribute="firstname" operator="eq" value="Ann" /></filter>
           </entity></fetch>"#,
    );
    let ann = &result.entities[0];
    assert_eq!(ann.formatted("status"), Some("Active"));
    assert_eq!(ann.formatted("remote"), Some("True"));

    let checks = run(
        &engine,
        r#"<fetch><entity name="paycheck">
             <attribute name="amount" />
             <filter><condition attribute="amount" operator="eq" value="100" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(checks.entities[0].formatted("amount"), Some("100"));

    let jobs = run(
        &engine,
        r#"<fetch><entity name="employment"><all-attributes />
             <filter><condition attribute="role" operator="eq" value="engineer" /></filter>
           </entity></fetch>"#,
    );
    assert_eq!(jobs.entities[0].formatted("personid"), Some("Ann"));
}

// ============================================================================
// Error taxonomy
// ============================================================================

#[test]
fn between_requires_exactly_two_bounds() {
    let engine = engine();
    let err = engine
        .execute_fetch(
            r#"<fetch><entity name="person">
                 <filter>
                   <condition attribute="age" operator="between">
                     <value>20</value>
                   </condition>
                 </filter>
               </entity></fetch>"#,
        )
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidCondition { .. }));
}

#[test]
fn uncoercible_literals_report_the_target_attribute() {
    let engine = engine();
    let err = engine
        .execute_fetch(
            r#"<fetch><entity name="person">
                 <filter><condition attribute="age" operator="eq" value="abc" /></filter>
               </entity></fetch>"#,
        )
        .unwrap_err();
    assert!(matches!(err, QueryError::TypeConversion(_)));
    assert!(
        err.to_string()
            .starts_with("cannot convert value 'abc' for person.age")
    );
}
