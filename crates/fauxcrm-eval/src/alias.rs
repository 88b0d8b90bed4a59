//! Alias resolution over the link-entity tree.
//!
//! A condition, order or projected token may name a link by its alias, by
//! its logical name when no alias was declared, or refer to the root
//! entity. Resolution is an explicit recursive traversal of the link tree.

use fauxcrm_query::{LinkEntity, QueryExpression};

/// Resolve an alias token (or a dotted `alias.attribute` token) to the
/// logical name of the entity that owns it.
///
/// Matches first by the link's effective alias (explicit alias, or logical
/// name when none was declared), searching the tree recursively; a token
/// that matches no link refers to the root entity.
pub fn resolve_entity_name<'q>(query: &'q QueryExpression, token: &str) -> &'q str {
    let head = token.split('.').next().unwrap_or(token);
    find_link(&query.link_entities, head)
        .map(|link| link.name.as_str())
        .unwrap_or(&query.entity_name)
}

/// Find the link a bare alias token names, recursively.
pub(crate) fn find_link<'q>(links: &'q [LinkEntity], token: &str) -> Option<&'q LinkEntity> {
    for link in links {
        if link.effective_alias() == token {
            return Some(link);
        }
        if let Some(found) = find_link(&link.links, token) {
            return Some(found);
        }
    }
    None
}

/// Full dotted alias path of the link a token names, for row-key lookup.
///
/// Joined attributes are keyed by the dotted path of effective aliases from
/// the root, so a link aliased `comp` nested under one aliased `emp` keys
/// its attributes as `emp.comp.<attr>`.
pub(crate) fn find_alias_path(links: &[LinkEntity], token: &str) -> Option<String> {
    for link in links {
        let alias = link.effective_alias();
        if alias == token {
            return Some(alias.to_string());
        }
        if let Some(inner) = find_alias_path(&link.links, token) {
            return Some(format!("{alias}.{inner}"));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use fauxcrm_query::{JoinType, QueryExpression};

    fn person_employment_query() -> QueryExpression {
        QueryExpression::new("person").with_link(
            LinkEntity::new("employment", "personid", "personid", JoinType::Inner)
                .with_alias("emp")
                .with_link(
                    LinkEntity::new("company", "companyid", "companyid", JoinType::Outer)
                        .with_alias("comp"),
                ),
        )
    }

    #[test]
    fn alias_token_resolves_to_linked_entity() {
        let query = person_employment_query();
        assert_eq!(resolve_entity_name(&query, "emp"), "employment");
        assert_eq!(resolve_entity_name(&query, "emp.enddate"), "employment");
    }

    #[test]
    fn nested_alias_resolves_through_the_tree() {
        let query = person_employment_query();
        assert_eq!(resolve_entity_name(&query, "comp"), "company");
        assert_eq!(
            find_alias_path(&query.link_entities, "comp").as_deref(),
            Some("emp.comp")
        );
    }

    #[test]
    fn logical_name_matches_when_no_alias_was_declared() {
        let query = QueryExpression::new("person").with_link(LinkEntity::new(
            "employment",
            "personid",
            "personid",
            JoinType::Inner,
        ));
        assert_eq!(resolve_entity_name(&query, "employment"), "employment");
    }

    #[test]
    fn unmatched_token_refers_to_the_root_entity() {
        let query = person_employment_query();
        assert_eq!(resolve_entity_name(&query, "nosuch"), "person");
    }
}
