//! PostgreSQL 기반 가격/상태 테이블.
//!
//! 가격 테이블의 기본 키는 `(timestamp, spot_price)`이며
//! 같은 키의 아이템은 `ON CONFLICT ... DO UPDATE`로 덮어씁니다.

use async_trait::async_trait;
use spotprice_core::PriceItem;
use sqlx::PgPool;

use super::{validate_identifier, PriceTable, StatusItem, StatusTable};
use crate::Result;

/// PostgreSQL 가격 테이블.
#[derive(Debug, Clone)]
pub struct PgPriceTable {
    pool: PgPool,
    table: String,
}

impl PgPriceTable {
    /// 테이블 이름을 검증하고 생성합니다.
    pub fn new(pool: PgPool, table: &str) -> Result<Self> {
        let table = validate_identifier(table)?.to_string();
        Ok(Self { pool, table })
    }

    /// 테이블이 없으면 생성합니다.
    pub async fn ensure_schema(&self) -> Result<()> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                timestamp TEXT NOT NULL,
                spot_price TEXT NOT NULL,
                region_name TEXT NOT NULL,
                availability_zone TEXT NOT NULL,
                instance_type TEXT NOT NULL,
                product_description TEXT NOT NULL,
                on_demand_price TEXT NOT NULL,
                unit TEXT NOT NULL,
                record_date DATE NOT NULL,
                PRIMARY KEY (timestamp, spot_price)
            )
            "#,
            table = self.table
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PriceTable for PgPriceTable {
    async fn upsert(&self, item: &PriceItem) -> Result<()> {
        let sql = format!(
            r#"
            INSERT INTO "{table}" (
                timestamp, spot_price, region_name, availability_zone, instance_type,
                product_description, on_demand_price, unit, record_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (timestamp, spot_price)
            DO UPDATE SET
                region_name = EXCLUDED.region_name,
                availability_zone = EXCLUDED.availability_zone,
                instance_type = EXCLUDED.instance_type,
                product_description = EXCLUDED.product_description,
                on_demand_price = EXCLUDED.on_demand_price,
                unit = EXCLUDED.unit,
                record_date = EXCLUDED.record_date
            "#,
            table = self.table
        );

        sqlx::query(&sql)
            .bind(&item.timestamp)
            .bind(&item.spot_price)
            .bind(&item.region_name)
            .bind(&item.availability_zone)
            .bind(&item.instance_type)
            .bind(&item.product_description)
            .bind(&item.on_demand_price)
            .bind(&item.unit)
            .bind(item.record_date)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// PostgreSQL 상태 테이블.
///
/// 컬럼: `partition_value`, `resource` (`region|hostname`), `instance_status`.
#[derive(Debug, Clone)]
pub struct PgStatusTable {
    pool: PgPool,
    table: String,
}

impl PgStatusTable {
    pub fn new(pool: PgPool, table: &str) -> Result<Self> {
        let table = validate_identifier(table)?.to_string();
        Ok(Self { pool, table })
    }
}

#[async_trait]
impl StatusTable for PgStatusTable {
    async fn query(&self, value: &str, region: Option<&str>) -> Result<Vec<StatusItem>> {
        let rows: Vec<(String, String, String)> = match region {
            Some(region) => {
                let sql = format!(
                    r#"
                    SELECT partition_value, resource, instance_status
                    FROM "{}"
                    WHERE partition_value = $1 AND left(resource, length($2)) = $2
                    ORDER BY resource
                    "#,
                    self.table
                );
                sqlx::query_as(&sql)
                    .bind(value)
                    .bind(format!("{}|", region))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    r#"
                    SELECT partition_value, resource, instance_status
                    FROM "{}"
                    WHERE partition_value = $1
                    ORDER BY resource
                    "#,
                    self.table
                );
                sqlx::query_as(&sql)
                    .bind(value)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|(partition_value, resource, instance_status)| StatusItem {
                partition_value,
                resource,
                instance_status,
            })
            .collect())
    }
}
