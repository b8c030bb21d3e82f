//! Deployment registry (PostgreSQL)

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::DeployResult;
use crate::pipeline::{Deployment, DeploymentRegistry};

pub struct PgRegistry {
    pool: PgPool,
}

impl PgRegistry {
    /// Connection is deferred until the first registration
    pub fn connect_lazy(database_url: &str) -> DeployResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }
}

impl DeploymentRegistry for PgRegistry {
    async fn register(&self, deployment: &Deployment) -> DeployResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO model_deployments
                (deployment_id, model_version, environment, accuracy, precision, recall, deployed_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active')
            "#,
        )
        .bind(&deployment.id)
        .bind(&deployment.version)
        .bind(deployment.environment.as_str())
        .bind(deployment.metrics.accuracy)
        .bind(deployment.metrics.precision)
        .bind(deployment.metrics.recall)
        .bind(deployment.deployed_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE model_registry
            SET current_deployment_id = $1, last_updated = $2
            WHERE environment = $3
            "#,
        )
        .bind(&deployment.id)
        .bind(deployment.deployed_at)
        .bind(deployment.environment.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
