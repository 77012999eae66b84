//! Catalog repository
//!
//! Read-only access to products, price tables, courses, packs, and the
//! enrollment-tuition bundle mapping. Implements the `CatalogPort` consumed
//! by the billing engine.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use core_kernel::{CourseId, DomainPort, PortError, ProductId, TenantContext};
use domain_catalog::{
    CatalogPort, Course, CourseDefinition, CourseItem, ItemType, Pack, PriceTable,
    PriceTableKind, PricedProduct,
};

use crate::error::to_port_error;

/// PostgreSQL-backed implementation of the catalog read interface
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the items of one course, in definition order
    async fn load_course_items(&self, course_id: Uuid) -> Result<Vec<CourseItem>, PortError> {
        let rows: Vec<CourseItemRow> = sqlx::query_as(
            r#"
            SELECT p.product_id, p.display_name, p.item_type, p.base_price, p.tax_rate,
                   ci.quantity
            FROM course_items ci
            JOIN products p ON p.product_id = ci.product_id
            WHERE ci.course_id = $1
            ORDER BY ci.position
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(to_port_error)?;

        let product_ids: Vec<Uuid> = rows.iter().map(|r| r.product_id).collect();
        let prices = self.load_price_tables(&product_ids).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let (product_row, quantity) = row.into_parts();
            let product = product_row.into_product(&prices)?;
            let item = CourseItem::new(product, quantity)
                .map_err(|e| PortError::internal(e.to_string()))?;
            items.push(item);
        }
        Ok(items)
    }

    /// Loads price-table overrides for a set of products
    async fn load_price_tables(
        &self,
        product_ids: &[Uuid],
    ) -> Result<Vec<PriceRow>, PortError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as(
            r#"
            SELECT product_id, table_kind, month, price
            FROM product_prices
            WHERE product_id = ANY($1)
            ORDER BY product_id, table_kind, month
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(to_port_error)
    }

    /// Loads one product row with its price table, scoped to the brand
    async fn load_product(
        &self,
        tenant: &TenantContext,
        product_id: Uuid,
    ) -> Result<Option<PricedProduct>, PortError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, display_name, item_type, base_price, tax_rate
            FROM products
            WHERE product_id = $1 AND brand_id = $2
            "#,
        )
        .bind(product_id)
        .bind(*tenant.brand_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(to_port_error)?;

        match row {
            Some(row) => {
                let prices = self.load_price_tables(&[row.product_id]).await?;
                Ok(Some(row.into_product(&prices)?))
            }
            None => Ok(None),
        }
    }
}

impl DomainPort for CatalogRepository {}

#[async_trait]
impl CatalogPort for CatalogRepository {
    #[instrument(skip(self), fields(tenant = %tenant))]
    async fn find_course(
        &self,
        tenant: &TenantContext,
        id: CourseId,
    ) -> Result<CourseDefinition, PortError> {
        let row: Option<CourseRow> = sqlx::query_as(
            r#"
            SELECT course_id, name, kind
            FROM courses
            WHERE course_id = $1 AND brand_id = $2 AND school_id = $3
            "#,
        )
        .bind(*id.as_uuid())
        .bind(*tenant.brand_id.as_uuid())
        .bind(*tenant.school_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(to_port_error)?;

        let row = row.ok_or_else(|| PortError::not_found("Course", id))?;

        match row.kind.as_str() {
            "course" => {
                let items = self.load_course_items(row.course_id).await?;
                Ok(CourseDefinition::Course(Course::new(
                    CourseId::from(row.course_id),
                    row.name,
                    items,
                )))
            }
            "pack" => {
                let members: Vec<CourseRow> = sqlx::query_as(
                    r#"
                    SELECT c.course_id, c.name, c.kind
                    FROM pack_members pm
                    JOIN courses c ON c.course_id = pm.course_id
                    WHERE pm.pack_id = $1
                    ORDER BY pm.position
                    "#,
                )
                .bind(row.course_id)
                .fetch_all(&self.pool)
                .await
                .map_err(to_port_error)?;

                let mut courses = Vec::with_capacity(members.len());
                for member in members {
                    let items = self.load_course_items(member.course_id).await?;
                    courses.push(Course::new(
                        CourseId::from(member.course_id),
                        member.name,
                        items,
                    ));
                }
                let direct_items = self.load_course_items(row.course_id).await?;

                Ok(CourseDefinition::Pack(Pack::new(
                    CourseId::from(row.course_id),
                    row.name,
                    courses,
                    direct_items,
                )))
            }
            other => Err(PortError::internal(format!(
                "unknown course kind '{other}' for {id}"
            ))),
        }
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    async fn find_product(
        &self,
        tenant: &TenantContext,
        id: ProductId,
    ) -> Result<PricedProduct, PortError> {
        self.load_product(tenant, *id.as_uuid())
            .await?
            .ok_or_else(|| PortError::not_found("Product", id))
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    async fn find_enrollment_tuition_product(
        &self,
        tenant: &TenantContext,
        course_id: CourseId,
        ticket_count: u32,
    ) -> Result<Option<PricedProduct>, PortError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT product_id
            FROM enrollment_tuition_products
            WHERE course_id = $1 AND ticket_count = $2
            "#,
        )
        .bind(*course_id.as_uuid())
        .bind(ticket_count as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(to_port_error)?;

        match row {
            Some((product_id,)) => self.load_product(tenant, product_id).await,
            None => Ok(None),
        }
    }
}

/// Database row for a product
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    display_name: String,
    item_type: String,
    base_price: Decimal,
    tax_rate: Decimal,
}

impl ProductRow {
    fn into_product(self, prices: &[PriceRow]) -> Result<PricedProduct, PortError> {
        let item_type: ItemType = self
            .item_type
            .parse()
            .map_err(|_| PortError::internal(format!("unknown item type '{}'", self.item_type)))?;

        let mut table = PriceTable::new();
        for price in prices.iter().filter(|p| p.product_id == self.product_id) {
            let kind = match price.table_kind.as_str() {
                "enrollment" => PriceTableKind::Enrollment,
                "billing" => PriceTableKind::Billing,
                other => {
                    return Err(PortError::internal(format!(
                        "unknown price table kind '{other}'"
                    )))
                }
            };
            table.set(kind, price.month as u32, price.price);
        }

        let mut product = PricedProduct::new(
            ProductId::from(self.product_id),
            self.display_name,
            item_type,
            self.base_price,
        )
        .with_tax_rate(self.tax_rate);
        product.price_table = table;
        Ok(product)
    }
}

/// Database row for a price-table entry
#[derive(Debug, Clone, sqlx::FromRow)]
struct PriceRow {
    product_id: Uuid,
    table_kind: String,
    month: i32,
    price: Decimal,
}

/// Database row for a course or pack header
#[derive(Debug, Clone, sqlx::FromRow)]
struct CourseRow {
    course_id: Uuid,
    name: String,
    kind: String,
}

/// Database row for a course item joined with its product
#[derive(Debug, Clone, sqlx::FromRow)]
struct CourseItemRow {
    product_id: Uuid,
    display_name: String,
    item_type: String,
    base_price: Decimal,
    tax_rate: Decimal,
    quantity: i32,
}

impl CourseItemRow {
    fn into_parts(self) -> (ProductRow, u32) {
        let quantity = self.quantity.max(0) as u32;
        (
            ProductRow {
                product_id: self.product_id,
                display_name: self.display_name,
                item_type: self.item_type,
                base_price: self.base_price,
                tax_rate: self.tax_rate,
            },
            quantity,
        )
    }
}
