//! FetchXML document parsing.
//!
//! The document is first read into a small element tree with quick-xml,
//! then converted node by node into the query tree. FetchXML documents are
//! shallow and small, so materializing the tree keeps the recursive
//! `link-entity`/`filter` shapes straightforward.

use crate::error::{FetchError, FetchResult};
use fauxcrm_query::{
    AggregateType, ColumnExpression, ColumnSet, ConditionExpression, ConditionOperator,
    FilterExpression, JoinType, LinkEntity, LogicalOperator, OrderExpression, QueryExpression,
};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

/// Parse a FetchXML document into a query expression.
pub fn parse_fetch(xml: &str) -> FetchResult<QueryExpression> {
    let root = read_tree(xml)?;
    if root.name != "fetch" {
        return Err(FetchError::invalid(format!(
            "expected root element 'fetch', found '{}'",
            root.name
        )));
    }

    let mut entities = root.children.iter().filter(|c| c.name == "entity");
    let entity = entities
        .next()
        .ok_or_else(|| FetchError::invalid("'fetch' must contain an 'entity' element"))?;
    if entities.next().is_some() {
        return Err(FetchError::invalid(
            "'fetch' must contain exactly one 'entity' element",
        ));
    }

    let mut query = QueryExpression::new(entity.require_attr("entity", "name")?);
    query.aggregate = root.truthy_attr("aggregate");
    query.distinct = root.truthy_attr("distinct");
    query.return_total_record_count = root.truthy_attr("returntotalrecordcount");
    query.top_count = root.integer_attr("top")?;

    let count = root.integer_attr("count")?;
    let page = root.integer_attr("page")?;
    match (count, page) {
        (Some(count), page) => {
            query.page_info = Some(fauxcrm_query::PagingInfo {
                page_number: page.unwrap_or(1),
                count,
            });
        }
        (None, Some(_)) => {
            return Err(FetchError::invalid(
                "'page' requires a 'count' attribute on 'fetch'",
            ));
        }
        (None, None) => {}
    }

    let body = build_entity_body(entity)?;
    query.column_set = body.columns;
    query.criteria = body.criteria;
    query.link_entities = body.links;
    query.orders = body.orders;
    Ok(query)
}

/// Shared shape of `entity` and `link-entity` children.
struct EntityBody {
    columns: ColumnSet,
    criteria: FilterExpression,
    links: Vec<LinkEntity>,
    orders: Vec<OrderExpression>,
}

fn build_entity_body(node: &XmlNode) -> FetchResult<EntityBody> {
    let mut columns = ColumnSet::none();
    let mut filters = Vec::new();
    let mut links = Vec::new();
    let mut orders = Vec::new();

    for child in &node.children {
        match child.name.as_str() {
            "all-attributes" => columns.all_columns = true,
            "attribute" => {
                columns.add(build_column(child)?);
            }
            "filter" => filters.push(build_filter(child)?),
            "link-entity" => {
                let (link, link_orders) = build_link(child)?;
                links.push(link);
                orders.extend(link_orders);
            }
            "order" => orders.push(build_order(child)?),
            other => {
                return Err(FetchError::invalid(format!(
                    "unknown element '{other}' inside '{}'",
                    node.name
                )));
            }
        }
    }

    // Sibling filters at the same level are a tolerated, non-canonical
    // document shape: combine them under an implicit AND instead of only
    // honoring the first.
    let criteria = match filters.len() {
        0 => FilterExpression::default(),
        1 => filters.into_iter().next().unwrap_or_default(),
        _ => {
            let mut combined = FilterExpression::new(LogicalOperator::And);
            combined.filters = filters;
            combined
        }
    };

    Ok(EntityBody {
        columns,
        criteria,
        links,
        orders,
    })
}

fn build_column(node: &XmlNode) -> FetchResult<ColumnExpression> {
    let mut column = ColumnExpression::new(node.require_attr("attribute", "name")?);
    if let Some(alias) = node.attr("alias") {
        column.alias = Some(alias.to_string());
    }
    if let Some(token) = node.attr("aggregate") {
        column.aggregate = Some(AggregateType::from_fetch_token(token).ok_or_else(|| {
            FetchError::invalid(format!("unknown aggregate function '{token}'"))
        })?);
    }
    column.distinct = node.truthy_attr("distinct");
    column.group_by = node.truthy_attr("groupby");
    Ok(column)
}

fn build_filter(node: &XmlNode) -> FetchResult<FilterExpression> {
    let operator = match node.attr("type") {
        None => LogicalOperator::And,
        Some("and") => LogicalOperator::And,
        Some("or") => LogicalOperator::Or,
        Some(other) => {
            return Err(FetchError::invalid(format!(
                "unknown filter type '{other}'"
            )));
        }
    };

    let mut filter = FilterExpression::new(operator);
    for child in &node.children {
        match child.name.as_str() {
            "condition" => filter.conditions.push(build_condition(child)?),
            "filter" => filter.filters.push(build_filter(child)?),
            other => {
                return Err(FetchError::invalid(format!(
                    "unknown element '{other}' inside 'filter'"
                )));
            }
        }
    }
    Ok(filter)
}

fn build_condition(node: &XmlNode) -> FetchResult<ConditionExpression> {
    let attribute = node.require_attr("condition", "attribute")?;
    let token = node.require_attr("condition", "operator")?;
    let operator = ConditionOperator::from_fetch_token(token).ok_or_else(|| {
        FetchError::UnknownOperator {
            token: token.to_string(),
        }
    })?;

    let mut condition = ConditionExpression::new(attribute, operator);
    if let Some(entity_name) = node.attr("entityname") {
        condition.entity_name = Some(entity_name.to_string());
    }
    if let Some(column) = node.attr("valueof") {
        condition.compare_column = Some(column.to_string());
    }
    if let Some(value) = node.attr("value") {
        condition = condition.with_value(value);
    }
    for child in &node.children {
        if child.name != "value" {
            return Err(FetchError::invalid(format!(
                "unknown element '{}' inside 'condition'",
                child.name
            )));
        }
        condition = condition.with_value(child.text.trim());
    }

    rewrite_like_wildcards(&mut condition);
    Ok(condition)
}

/// Rewrite `like`/`not-like` by leading/trailing `%` markers:
/// both → contains, trailing only → begins-with, leading only → ends-with.
/// The markers are stripped from the literal.
fn rewrite_like_wildcards(condition: &mut ConditionExpression) {
    use fauxcrm_query::ConditionValue;

    let negated = match condition.operator {
        ConditionOperator::Like => false,
        ConditionOperator::NotLike => true,
        _ => return,
    };
    let Some(ConditionValue::Raw(literal)) = condition.values.first() else {
        return;
    };

    let leading = literal.starts_with('%');
    let trailing = literal.len() >= 2 && literal.ends_with('%');
    let (operator, stripped) = match (leading, trailing) {
        (true, true) => (
            if negated {
                ConditionOperator::DoesNotContain
            } else {
                ConditionOperator::Contains
            },
            literal[1..literal.len() - 1].to_string(),
        ),
        (false, true) => (
            if negated {
                ConditionOperator::DoesNotBeginWith
            } else {
                ConditionOperator::BeginsWith
            },
            literal[..literal.len() - 1].to_string(),
        ),
        (true, false) => (
            if negated {
                ConditionOperator::DoesNotEndWith
            } else {
                ConditionOperator::EndsWith
            },
            literal[1..].to_string(),
        ),
        (false, false) => return,
    };

    condition.operator = operator;
    condition.values[0] = ConditionValue::Raw(stripped);
}

fn build_link(node: &XmlNode) -> FetchResult<(LinkEntity, Vec<OrderExpression>)> {
    let name = node.require_attr("link-entity", "name")?;
    let from = node.require_attr("link-entity", "from")?;
    let to = node.require_attr("link-entity", "to")?;
    let join_type = match node.attr("link-type") {
        None | Some("inner") => JoinType::Inner,
        Some("outer") => JoinType::Outer,
        Some(other) => {
            return Err(FetchError::invalid(format!(
                "unknown link-type '{other}'"
            )));
        }
    };

    let mut link = LinkEntity::new(name, from, to, join_type);
    if let Some(alias) = node.attr("alias") {
        link.alias = Some(alias.to_string());
    }

    let body = build_entity_body(node)?;
    link.columns = body.columns;
    link.criteria = body.criteria;
    link.links = body.links;

    // Orders declared inside a link refer to the link's own attributes;
    // qualify them with this link's alias so they address the joined row.
    let alias = link.effective_alias();
    let orders = body
        .orders
        .into_iter()
        .map(|mut order| {
            order.attribute = format!("{alias}.{}", order.attribute);
            order
        })
        .collect();

    Ok((link, orders))
}

fn build_order(node: &XmlNode) -> FetchResult<OrderExpression> {
    let attribute = node
        .attr("attribute")
        .or_else(|| node.attr("alias"))
        .ok_or_else(|| {
            FetchError::invalid("'order' requires an 'attribute' or 'alias' attribute")
        })?;
    Ok(if node.truthy_attr("descending") {
        OrderExpression::descending(attribute)
    } else {
        OrderExpression::ascending(attribute)
    })
}

// ============================================================================
// Element tree
// ============================================================================

#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn require_attr(&self, element: &str, name: &str) -> FetchResult<&str> {
        self.attr(name).ok_or_else(|| {
            FetchError::invalid(format!("'{element}' requires a '{name}' attribute"))
        })
    }

    /// The literal strings "true" and "1" (case-insensitive) are true,
    /// anything else (including absence) is false.
    fn truthy_attr(&self, name: &str) -> bool {
        self.attr(name)
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
    }

    fn integer_attr(&self, name: &str) -> FetchResult<Option<u32>> {
        match self.attr(name) {
            None => Ok(None),
            Some(value) => value.trim().parse::<u32>().map(Some).map_err(|_| {
                FetchError::InvalidPagingValue {
                    attribute: name.to_string(),
                    value: value.to_string(),
                }
            }),
        }
    }
}

fn node_from(start: &BytesStart<'_>) -> FetchResult<XmlNode> {
    let mut node = XmlNode {
        name: String::from_utf8_lossy(start.name().as_ref()).to_string(),
        ..XmlNode::default()
    };
    for attr in start.attributes() {
        let attr = attr?;
        node.attrs.push((
            String::from_utf8_lossy(attr.key.as_ref()).to_string(),
            String::from_utf8_lossy(&attr.value).to_string(),
        ));
    }
    Ok(node)
}

fn read_tree(xml: &str) -> FetchResult<XmlNode> {
    // Text is accumulated untrimmed so entity references keep their adjacent
    // whitespace; the accumulated text is trimmed where it is consumed.
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(node_from(&e)?),
            Ok(Event::Empty(e)) => {
                let node = node_from(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| FetchError::invalid("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(open) = stack.last_mut() {
                    let text = t
                        .xml_content()
                        .map_err(|e| FetchError::invalid(format!("bad text content: {e}")))?;
                    open.text.push_str(&text);
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let Some(open) = stack.last_mut() {
                    let char_ref = r
                        .resolve_char_ref()
                        .map_err(|e| FetchError::invalid(format!("bad entity reference: {e}")))?;
                    if let Some(ch) = char_ref {
                        open.text.push(ch);
                    } else {
                        let name = r.xml_content().map_err(|e| {
                            FetchError::invalid(format!("bad entity reference: {e}"))
                        })?;
                        let resolved = resolve_predefined_entity(&name).ok_or_else(|| {
                            FetchError::invalid(format!("unknown entity reference '&{name};'"))
                        })?;
                        open.text.push_str(resolved);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FetchError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(FetchError::invalid("unclosed element"));
    }
    root.ok_or_else(|| FetchError::invalid("empty document"))
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> FetchResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_some() {
                return Err(FetchError::invalid("multiple root elements"));
            }
            *root = Some(node);
        }
    }
    Ok(())
}
