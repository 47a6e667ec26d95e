use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{query_all, Category, Dimension};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: DbPool,
}

impl CategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_dimension(&self, dimension: Dimension) -> Result<Vec<Category>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let categories = query_all(
                &conn,
                "SELECT * FROM categories WHERE dimension = ? ORDER BY name",
                [dimension.number()],
            )?;
            Ok(categories)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Admin tooling only.
    pub async fn create(&self, dimension: Dimension, name: &str) -> Result<Category> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }
        let category = Category {
            id: Uuid::new_v4().to_string(),
            dimension,
            name,
        };
        let category_clone = category.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO categories (id, dimension, name) VALUES (?, ?, ?)",
                rusqlite::params![
                    category_clone.id,
                    category_clone.dimension.number(),
                    category_clone.name
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(category)
    }

    /// Admin tooling only. Workout types tagged with the category keep
    /// existing with that dimension cleared.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM categories WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
