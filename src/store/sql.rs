use super::Store;
use crate::error::StoreError;
use crate::model::{PeerGroup, PeerGroupId, Project, ProjectId, ScopeId, TlId};
use sqlx::any::{AnyConnectOptions, AnyRow};
use sqlx::{AnyConnection, Connection, Row};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::{debug, trace};

/// Store backed by the course database.
pub struct SqlStore {
    conn: AnyConnection,
    numbered: bool,
}

impl SqlStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        sqlx::any::install_default_drivers();
        let conn = AnyConnection::connect_with(&AnyConnectOptions::from_str(url)?).await?;
        let numbered = conn.backend_name() == "PostgreSQL";
        debug!(backend = %conn.backend_name(), "Connected to database");
        Ok(Self { conn, numbered })
    }

    /// Queries are written with `?` parameters, PostgreSQL wants `$1`, `$2`…
    fn sql(&self, query: &'static str) -> Cow<'static, str> {
        if self.numbered {
            Cow::Owned(number_placeholders(query))
        } else {
            Cow::Borrowed(query)
        }
    }
}

fn number_placeholders(query: &str) -> String {
    let mut numbered = String::with_capacity(query.len() + 8);
    let mut n = 0;
    for c in query.chars() {
        if c == '?' {
            n += 1;
            numbered.push('$');
            numbered.push_str(&n.to_string());
        } else {
            numbered.push(c);
        }
    }
    numbered
}

/// Identifiers are `INTEGER` columns.
fn column(what: &'static str, value: i64) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::OutOfRange { what, value })
}

fn unsigned(row: &AnyRow, name: &str) -> Result<u32, sqlx::Error> {
    u32::try_from(row.try_get::<i32, _>(name)?).map_err(|e| sqlx::Error::ColumnDecode {
        index: name.to_owned(),
        source: e.into(),
    })
}

fn project_from_row(row: AnyRow) -> Result<Project, sqlx::Error> {
    Ok(Project {
        id: ProjectId(row.try_get::<i32, _>("id")?.into()),
        nr: unsigned(&row, "nr")?,
        title: row.try_get("title")?,
        ag_mail: row.try_get("ag_mail")?,
        tl: row.try_get::<Option<i32>, _>("tl_id")?.map(|id| TlId(id.into())),
        peer_group: row
            .try_get::<Option<i32>, _>("peer_group_id")?
            .map(|id| PeerGroupId(id.into())),
    })
}

fn peer_group_from_row(row: AnyRow) -> Result<PeerGroup, sqlx::Error> {
    Ok(PeerGroup {
        id: PeerGroupId(row.try_get::<i32, _>("id")?.into()),
        bp: ScopeId(row.try_get::<i32, _>("bp_id")?.into()),
        number: unsigned(&row, "number")?,
    })
}

impl Store for SqlStore {
    async fn active_scope(&mut self) -> Result<ScopeId, StoreError> {
        let scopes = sqlx::query("SELECT id FROM bp_bp WHERE active")
            .try_map(|row: AnyRow| Ok(ScopeId(row.try_get::<i32, _>("id")?.into())))
            .fetch_all(&mut self.conn)
            .await?;
        match scopes[..] {
            [] => Err(StoreError::NoActiveScope),
            [scope] => Ok(scope),
            _ => Err(StoreError::SeveralActiveScopes(scopes.len())),
        }
    }

    async fn active_projects(&mut self, scope: ScopeId) -> Result<Vec<Project>, StoreError> {
        let query = self.sql(
            "SELECT id, nr, title, ag_mail, tl_id, peer_group_id FROM bp_project \
             WHERE bp_id = ? ORDER BY nr",
        );
        let projects = sqlx::query(&query)
            .bind(column("BP", scope.0)?)
            .try_map(project_from_row)
            .fetch_all(&mut self.conn)
            .await?;
        debug!(scope = %scope, projects = %projects.len(), "Loaded projects");
        Ok(projects)
    }

    async fn peer_groups(&mut self, scope: ScopeId) -> Result<Vec<PeerGroup>, StoreError> {
        let query =
            self.sql("SELECT id, bp_id, number FROM bp_peergroup WHERE bp_id = ? ORDER BY number");
        Ok(sqlx::query(&query)
            .bind(column("BP", scope.0)?)
            .try_map(peer_group_from_row)
            .fetch_all(&mut self.conn)
            .await?)
    }

    async fn create_peer_group(
        &mut self,
        scope: ScopeId,
        number: u32,
    ) -> Result<PeerGroup, StoreError> {
        let bp = column("BP", scope.0)?;
        let number = column("peer group number", number.into())?;
        let insert = self.sql("INSERT INTO bp_peergroup (bp_id, number) VALUES (?, ?)");
        sqlx::query(&insert)
            .bind(bp)
            .bind(number)
            .execute(&mut self.conn)
            .await?;
        let select =
            self.sql("SELECT id, bp_id, number FROM bp_peergroup WHERE bp_id = ? AND number = ?");
        let group = sqlx::query(&select)
            .bind(bp)
            .bind(number)
            .try_map(peer_group_from_row)
            .fetch_one(&mut self.conn)
            .await?;
        trace!(scope = %scope, number = %number, id = %group.id.0, "Created peer group");
        Ok(group)
    }

    async fn set_peer_group(
        &mut self,
        project: ProjectId,
        group: PeerGroupId,
    ) -> Result<(), StoreError> {
        let query = self.sql("UPDATE bp_project SET peer_group_id = ? WHERE id = ?");
        let result = sqlx::query(&query)
            .bind(column("peer group", group.0)?)
            .bind(column("project", project.0)?)
            .execute(&mut self.conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownProject(project));
        }
        Ok(())
    }

    async fn delete_peer_groups(&mut self, scope: ScopeId) -> Result<usize, StoreError> {
        let bp = column("BP", scope.0)?;
        let detach = self.sql(
            "UPDATE bp_project SET peer_group_id = NULL WHERE peer_group_id IN \
             (SELECT id FROM bp_peergroup WHERE bp_id = ?)",
        );
        let delete = self.sql("DELETE FROM bp_peergroup WHERE bp_id = ?");
        let mut trans = self.conn.begin().await?;
        sqlx::query(&detach).bind(bp).execute(&mut *trans).await?;
        let deleted = sqlx::query(&delete).bind(bp).execute(&mut *trans).await?;
        trans.commit().await?;
        Ok(usize::try_from(deleted.rows_affected()).unwrap_or(usize::MAX))
    }
}
