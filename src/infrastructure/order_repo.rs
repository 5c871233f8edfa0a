use std::collections::HashMap;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, OrderLineView, OrderUpdate, OrderView, ProductSummary, ShippingDetails,
    ShippingInput,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_lines, orders, products, shipping_details};

use super::models::{
    NewOrderLineRow, NewOrderRow, NewShippingRow, OrderLineRow, OrderRow, ProductSummaryRow,
    ShippingChangeset, ShippingRow,
};

impl From<ShippingRow> for ShippingDetails {
    fn from(row: ShippingRow) -> Self {
        ShippingDetails {
            id: row.id,
            order_id: row.order_id,
            address: row.address,
            city: row.city,
            postal_code: row.postal_code,
            country: row.country,
            phone: row.phone,
        }
    }
}

fn line_view(line: OrderLineRow, product: Option<ProductSummaryRow>) -> OrderLineView {
    OrderLineView {
        id: line.id,
        product_id: line.product_id,
        quantity: line.quantity,
        price: line.price,
        product: product.map(|p| ProductSummary {
            id: p.id,
            name: p.name,
            category: p.category,
            image_url: p.image_url,
        }),
    }
}

/// Attach lines (with product summaries) and shipping to each order header.
fn assemble(
    conn: &mut PgConnection,
    headers: Vec<OrderRow>,
) -> Result<Vec<OrderView>, DomainError> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let order_ids: Vec<Uuid> = headers.iter().map(|o| o.id).collect();

    let lines: Vec<(OrderLineRow, Option<ProductSummaryRow>)> = order_lines::table
        .left_join(products::table.on(products::id.eq(order_lines::product_id)))
        .filter(order_lines::order_id.eq_any(&order_ids))
        .select((
            OrderLineRow::as_select(),
            Option::<ProductSummaryRow>::as_select(),
        ))
        .order(order_lines::created_at.asc())
        .load(conn)?;

    let shipping: Vec<ShippingRow> = shipping_details::table
        .filter(shipping_details::order_id.eq_any(&order_ids))
        .select(ShippingRow::as_select())
        .load(conn)?;

    let mut lines_by_order: HashMap<Uuid, Vec<OrderLineView>> = HashMap::new();
    for (line, product) in lines {
        lines_by_order
            .entry(line.order_id)
            .or_default()
            .push(line_view(line, product));
    }
    let mut shipping_by_order: HashMap<Uuid, ShippingDetails> = shipping
        .into_iter()
        .map(|s| (s.order_id, ShippingDetails::from(s)))
        .collect();

    Ok(headers
        .into_iter()
        .map(|o| OrderView {
            lines: lines_by_order.remove(&o.id).unwrap_or_default(),
            shipping: shipping_by_order.remove(&o.id),
            id: o.id,
            user_id: o.user_id,
            status: o.status,
            total_amount: o.total_amount,
            created_at: o.created_at,
            updated_at: o.updated_at,
        })
        .collect())
}

fn load_order(conn: &mut PgConnection, id: Uuid) -> Result<Option<OrderView>, DomainError> {
    let header = orders::table
        .find(id)
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    match header {
        Some(header) => Ok(assemble(conn, vec![header])?.pop()),
        None => Ok(None),
    }
}

/// Lock the order row for the rest of the transaction; `false` when absent.
fn lock_order(conn: &mut PgConnection, id: Uuid) -> Result<bool, DomainError> {
    let found = orders::table
        .find(id)
        .select(orders::id)
        .for_update()
        .first::<Uuid>(conn)
        .optional()?;
    Ok(found.is_some())
}

fn insert_shipping(
    conn: &mut PgConnection,
    order_id: Uuid,
    shipping: &ShippingInput,
) -> Result<(), DomainError> {
    let address = shipping.require_address()?;
    diesel::insert_into(shipping_details::table)
        .values(&NewShippingRow {
            id: Uuid::new_v4(),
            order_id,
            address,
            city: shipping.city.as_deref(),
            postal_code: shipping.postal_code.as_deref(),
            country: shipping.country.as_deref(),
            phone: shipping.phone.as_deref(),
        })
        .execute(conn)?;
    Ok(())
}

/// Patch the existing shipping row for `order_id`, or create one.
fn upsert_shipping(
    conn: &mut PgConnection,
    order_id: Uuid,
    shipping: &ShippingInput,
) -> Result<(), DomainError> {
    let existing = shipping_details::table
        .filter(shipping_details::order_id.eq(order_id))
        .select(shipping_details::id)
        .first::<Uuid>(conn)
        .optional()?;

    match existing {
        Some(shipping_id) => {
            diesel::update(shipping_details::table.find(shipping_id))
                .set(&ShippingChangeset {
                    address: shipping.address.as_deref(),
                    city: shipping.city.as_deref(),
                    postal_code: shipping.postal_code.as_deref(),
                    country: shipping.country.as_deref(),
                    phone: shipping.phone.as_deref(),
                    updated_at: Utc::now(),
                })
                .execute(conn)?;
            Ok(())
        }
        None => insert_shipping(conn, order_id, shipping),
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order header
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id: order.user_id,
                    status: &order.status,
                    total_amount: &order.total_amount,
                })
                .execute(conn)?;

            // 2. Insert one line per item, with the caller's price snapshot
            let new_lines: Vec<NewOrderLineRow> = order
                .items
                .iter()
                .map(|item| NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price.clone(),
                })
                .collect();
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            // 3. Shipping is optional
            if let Some(shipping) = &order.shipping {
                insert_shipping(conn, order_id, shipping)?;
            }

            load_order(conn, order_id)?.ok_or_else(|| {
                DomainError::Internal(format!("order {} missing after insert", order_id))
            })
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_order(&mut conn, id)
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let headers = orders::table
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        assemble(&mut conn, headers)
    }

    fn update(&self, id: Uuid, update: OrderUpdate) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if !lock_order(conn, id)? {
                return Ok(None);
            }

            if let Some(status) = &update.status {
                diesel::update(orders::table.find(id))
                    .set((
                        orders::status.eq(status.as_str()),
                        orders::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)?;
            }

            if let Some(shipping) = &update.shipping {
                upsert_shipping(conn, id, shipping)?;
            }

            load_order(conn, id)
        })
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if !lock_order(conn, id)? {
                return Ok(false);
            }

            // Dependents first: shipping, then lines, then the header.
            diesel::delete(shipping_details::table.filter(shipping_details::order_id.eq(id)))
                .execute(conn)?;
            diesel::delete(order_lines::table.filter(order_lines::order_id.eq(id)))
                .execute(conn)?;
            diesel::delete(orders::table.find(id)).execute(conn)?;

            Ok(true)
        })
    }
}
