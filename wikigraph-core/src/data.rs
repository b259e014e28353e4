//! Snapshot persistence.
//!
//! Graph nodes have global identity: several explorations may reference the
//! same article, and saving a node again overwrites its label, summary and
//! score. Each exploration owns its node membership and its "links to" rows,
//! so deleting one never touches another's graph.

use crate::model::{Exploration, GraphEdge, GraphNode, NewExploration};
use rusqlite::{Connection, Transaction, params};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Exploration not found: {0}")]
    RecordNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persists named exploration snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Store a snapshot under a freshly generated id.
    fn save(&self, exploration: &NewExploration) -> Result<Exploration>;

    /// Every stored snapshot, oldest first.
    fn list(&self) -> Result<Vec<Exploration>>;

    /// Remove a snapshot. Returns `false` if no snapshot had that id.
    fn delete(&self, id: &str) -> Result<bool>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

impl Database {
    pub fn drop(path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<()> {
        self.lock()?.execute_batch(
            "
CREATE TABLE IF NOT EXISTS explorations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- Articles, shared by every exploration that contains them
CREATE TABLE IF NOT EXISTS graph_nodes (
    id TEXT PRIMARY KEY,
    label TEXT NOT NULL,
    summary TEXT,
    degree_centrality REAL
);

CREATE TABLE IF NOT EXISTS exploration_nodes (
    exploration_id TEXT NOT NULL,
    node_id TEXT NOT NULL,
    position INTEGER NOT NULL,

    PRIMARY KEY(exploration_id, node_id),
    FOREIGN KEY(exploration_id) REFERENCES explorations(id) ON DELETE CASCADE,
    FOREIGN KEY(node_id) REFERENCES graph_nodes(id)
);

CREATE INDEX IF NOT EXISTS idx_exploration_nodes_node ON exploration_nodes(node_id);

-- Links-to relationships, duplicates kept
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    exploration_id TEXT NOT NULL,
    from_node TEXT NOT NULL,
    to_node TEXT NOT NULL,
    position INTEGER NOT NULL,

    FOREIGN KEY(exploration_id) REFERENCES explorations(id) ON DELETE CASCADE,
    FOREIGN KEY(from_node) REFERENCES graph_nodes(id),
    FOREIGN KEY(to_node) REFERENCES graph_nodes(id)
);

CREATE INDEX IF NOT EXISTS idx_links_exploration ON links(exploration_id);
            ",
        )?;
        Ok(())
    }

    fn upsert_node(tx: &Transaction<'_>, node: &GraphNode) -> Result<()> {
        tx.execute(
            "INSERT INTO graph_nodes (id, label, summary, degree_centrality) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                label = excluded.label,
                summary = excluded.summary,
                degree_centrality = excluded.degree_centrality",
            params![&node.id, &node.label, &node.summary, node.score],
        )?;
        Ok(())
    }

    fn nodes_for(conn: &Connection, exploration_id: &str) -> Result<Vec<GraphNode>> {
        let mut stmt = conn.prepare(
            "SELECT n.id, n.label, n.summary, n.degree_centrality
             FROM exploration_nodes en
             JOIN graph_nodes n ON n.id = en.node_id
             WHERE en.exploration_id = ?1
             ORDER BY en.position",
        )?;

        let nodes = stmt
            .query_map(params![exploration_id], |row| {
                Ok(GraphNode {
                    id: row.get(0)?,
                    label: row.get(1)?,
                    summary: row.get(2)?,
                    score: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(nodes)
    }

    fn edges_for(conn: &Connection, exploration_id: &str) -> Result<Vec<GraphEdge>> {
        let mut stmt = conn.prepare(
            "SELECT from_node, to_node FROM links WHERE exploration_id = ?1 ORDER BY position, id",
        )?;

        let edges = stmt
            .query_map(params![exploration_id], |row| {
                Ok(GraphEdge {
                    from: row.get(0)?,
                    to: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(edges)
    }
}

impl SnapshotStore for Database {
    fn save(&self, exploration: &NewExploration) -> Result<Exploration> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO explorations (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![&id, &exploration.name, current_timestamp()],
        )?;

        let mut members = HashSet::new();
        for (position, node) in exploration.nodes.iter().enumerate() {
            Self::upsert_node(&tx, node)?;
            tx.execute(
                "INSERT OR IGNORE INTO exploration_nodes (exploration_id, node_id, position) VALUES (?1, ?2, ?3)",
                params![&id, &node.id, position as i64],
            )?;
            members.insert(node.id.as_str());
        }

        // A link must join two nodes of this snapshot.
        let mut edges = Vec::new();
        for edge in &exploration.edges {
            if !members.contains(edge.from.as_str()) || !members.contains(edge.to.as_str()) {
                debug!("Dropping dangling edge {} -> {}", edge.from, edge.to);
                continue;
            }
            tx.execute(
                "INSERT INTO links (exploration_id, from_node, to_node, position) VALUES (?1, ?2, ?3, ?4)",
                params![&id, &edge.from, &edge.to, edges.len() as i64],
            )?;
            edges.push(edge.clone());
        }

        tx.commit()?;
        debug!(
            "Saved exploration {} ({} nodes, {} edges)",
            id,
            exploration.nodes.len(),
            edges.len()
        );

        Ok(Exploration {
            id,
            name: exploration.name.clone(),
            nodes: exploration.nodes.clone(),
            edges,
        })
    }

    fn list(&self) -> Result<Vec<Exploration>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name FROM explorations ORDER BY created_at, rowid")?;
        let headers = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        headers
            .into_iter()
            .map(|(id, name)| {
                let nodes = Self::nodes_for(&conn, &id)?;
                let edges = Self::edges_for(&conn, &id)?;
                Ok(Exploration {
                    id,
                    name,
                    nodes,
                    edges,
                })
            })
            .collect()
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM explorations WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}
