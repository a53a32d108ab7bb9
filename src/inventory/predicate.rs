//! Predicate composition: normalized filters to `SeaORM` conditions.

use super::filter::{Bounds, CarFilter, SimilarQuery};
use crate::domain::Visibility;
use crate::entities::cars;
use sea_orm::sea_query::{Expr, LikeExpr, Order, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

/// Condition selecting the listings that match `filter` for `visibility`.
///
/// Every supplied filter group is AND-ed; the free-text group is an OR over
/// tokens.
#[must_use]
pub fn listing_condition(filter: &CarFilter, visibility: Visibility) -> Condition {
    let mut condition = Condition::all();

    if !visibility.includes_sold() {
        condition = condition.add(cars::Column::IsAvailable.eq(true));
    }
    if let Some(make) = &filter.make {
        condition = condition.add(contains(cars::Column::MakeFolded, make));
    }
    if let Some(model) = &filter.model {
        condition = condition.add(contains(cars::Column::ModelFolded, model));
    }

    condition = within(condition, cars::Column::Price, filter.price);
    condition = within(condition, cars::Column::Year, filter.year);

    if let Some(fuel_type) = filter.fuel_type {
        condition = condition.add(cars::Column::FuelType.eq(fuel_type));
    }
    if let Some(body_type) = filter.body_type {
        condition = condition.add(cars::Column::BodyType.eq(body_type));
    }
    if let Some(transmission) = filter.transmission {
        condition = condition.add(cars::Column::Transmission.eq(transmission));
    }

    if !filter.search_tokens.is_empty() {
        let search = filter
            .search_tokens
            .iter()
            .fold(Condition::any(), |any, token| any.add(token_condition(token)));
        condition = condition.add(search);
    }

    condition
}

/// Newest listings first.
#[must_use]
pub fn listing_order() -> Vec<(SimpleExpr, Order)> {
    vec![(Expr::col(cars::Column::CreatedAt).into(), Order::Desc)]
}

/// Condition for "similar vehicles": available, not the excluded listing,
/// same make or same body style, optionally within a price band.
#[must_use]
pub fn similar_condition(query: &SimilarQuery) -> Condition {
    let mut resemblance = Condition::any().add(contains(cars::Column::MakeFolded, &query.make));
    if let Some(body_type) = query.body_type {
        resemblance = resemblance.add(cars::Column::BodyType.eq(body_type));
    }

    let mut condition = Condition::all()
        .add(cars::Column::IsAvailable.eq(true))
        .add(resemblance);

    if let Some(exclude) = &query.exclude {
        condition = condition.add(cars::Column::Id.ne(exclude.as_str()));
    }

    within(condition, cars::Column::Price, query.price)
}

/// Make matches first, then body-style matches, then recency.
#[must_use]
pub fn similar_order(query: &SimilarQuery) -> Vec<(SimpleExpr, Order)> {
    let mut order = vec![(
        rank(Condition::all().add(contains(cars::Column::MakeFolded, &query.make))),
        Order::Asc,
    )];
    if let Some(body_type) = query.body_type {
        order.push((
            rank(Condition::all().add(cars::Column::BodyType.eq(body_type))),
            Order::Asc,
        ));
    }
    order.push((Expr::col(cars::Column::CreatedAt).into(), Order::Desc));
    order
}

/// One search token: a case-insensitive substring of make, model, color or
/// description; an exact feature; or the model year.
fn token_condition(token: &str) -> Condition {
    let mut any = Condition::any()
        .add(contains(cars::Column::MakeFolded, token))
        .add(contains(cars::Column::ModelFolded, token))
        .add(contains(cars::Column::ColorFolded, token))
        .add(contains(cars::Column::DescriptionFolded, token))
        .add(has_feature(token));

    if let Ok(year) = token.parse::<i32>() {
        any = any.add(cars::Column::Year.eq(year));
    }

    any
}

/// Case-insensitive substring match against one of the `*_folded` columns.
fn contains(folded: cars::Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&fold_case(needle)));
    Expr::col(folded).like(LikeExpr::new(pattern).escape('\\'))
}

/// The case folding applied to searchable text, both when it is stored and
/// when it is queried.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Exact, case-sensitive membership in the JSON-encoded feature list.
fn has_feature(feature: &str) -> SimpleExpr {
    let encoded = serde_json::Value::from(feature).to_string();
    Expr::cust_with_values("instr(\"features\", ?) > 0", [encoded])
}

fn within<T>(condition: Condition, column: cars::Column, bounds: Bounds<T>) -> Condition
where
    T: Into<sea_orm::Value>,
{
    let mut condition = condition;
    if let Some(min) = bounds.min {
        condition = condition.add(column.gte(min));
    }
    if let Some(max) = bounds.max {
        condition = condition.add(column.lte(max));
    }
    condition
}

/// 0 when `condition` holds, 1 otherwise; ascending order puts matches first.
fn rank(condition: Condition) -> SimpleExpr {
    Expr::case(condition, 0).finally(1).into()
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BodyType, CarId, FuelType};
    use crate::inventory::filter::RawCarFilter;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryOrder, QueryTrait};

    fn sql(condition: Condition) -> String {
        cars::Entity::find()
            .filter(condition)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn public_listing_hides_sold_cars() {
        let filter = CarFilter::default();
        let public = sql(listing_condition(&filter, Visibility::Public));
        let admin = sql(listing_condition(&filter, Visibility::Admin));

        assert!(public.contains("\"is_available\""), "{public}");
        assert!(!admin.contains("is_available"), "{admin}");
    }

    #[test]
    fn bounds_are_inclusive() {
        let filter = RawCarFilter {
            min_price: Some("10000".into()),
            max_year: Some("2022".into()),
            ..Default::default()
        }
        .normalize();
        let query = sql(listing_condition(&filter, Visibility::Admin));

        assert!(query.contains("\"price\" >= 10000"), "{query}");
        assert!(query.contains("\"year\" <= 2022"), "{query}");
    }

    #[test]
    fn enums_compare_by_storage_value() {
        let filter = CarFilter {
            fuel_type: Some(FuelType::Electric),
            ..Default::default()
        };
        let query = sql(listing_condition(&filter, Visibility::Public));
        assert!(query.contains("\"fuel_type\" = 'ELECTRIC'"), "{query}");
    }

    #[test]
    fn search_tokens_are_or_ed() {
        let filter = CarFilter {
            search_tokens: vec!["toyota".into(), "2023".into()],
            ..Default::default()
        };
        let query = sql(listing_condition(&filter, Visibility::Admin));

        assert!(query.contains("LIKE '%toyota%'"), "{query}");
        assert!(query.contains("\"year\" = 2023"), "{query}");
        assert!(query.contains("instr(\"features\""), "{query}");
        assert!(query.contains(" OR "), "{query}");
    }

    #[test]
    fn text_matches_use_folded_columns() {
        let filter = CarFilter {
            make: Some("ŠKODA".into()),
            ..Default::default()
        };
        let query = sql(listing_condition(&filter, Visibility::Admin));

        assert!(query.contains("\"make_folded\" LIKE '%škoda%'"), "{query}");
        assert!(!query.contains("LOWER("), "{query}");
    }

    #[test]
    fn folding_covers_non_ascii_capitals() {
        assert_eq!(fold_case("Škoda"), fold_case("ŠKODA"));
        assert_eq!(fold_case("Grün Ärger"), "grün ärger");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }

    #[test]
    fn similar_excludes_and_ranks() {
        let query = SimilarQuery {
            make: "Honda".into(),
            body_type: Some(BodyType::Suv),
            exclude: Some(CarId::from("car-1")),
            price: Bounds::default(),
            limit: 6,
        };

        let mut select = cars::Entity::find().filter(similar_condition(&query));
        for (expr, order) in similar_order(&query) {
            select = select.order_by(expr, order);
        }
        let query = select.build(DbBackend::Sqlite).to_string();

        assert!(query.contains("\"id\" <> 'car-1'"), "{query}");
        assert!(query.contains("\"body_type\" = 'SUV'"), "{query}");
        assert!(query.contains("CASE WHEN"), "{query}");
        assert!(query.ends_with("\"created_at\" DESC"), "{query}");
    }
}
