use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use twenty48_core::snapshot::Snapshot;
use twenty48_core::store::StateStore;

/// Save-file store backed by a single SQLite database.
///
/// Schema:
/// - tiles(board_size INTEGER, record TEXT): one row per occupied cell
/// - meta(meta_key TEXT PRIMARY KEY, meta_value TEXT): board_size plus
///   score_N / highscore_N counters, stored as text
///
/// A board with no rows reads back as absent, so sizes that were never
/// played start fresh. Scalars that fail to parse are reported absent
/// with a warning instead of failing the load.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create or open the save file at `path`, ensure schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("failed to open save file {}", path.as_ref().display()))?;
        conn.pragma_update(None, "journal_mode", &"WAL")?;
        conn.pragma_update(None, "synchronous", &"NORMAL")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tiles (
                board_size INTEGER NOT NULL,
                record TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS meta (
                meta_key TEXT PRIMARY KEY,
                meta_value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    fn get_meta(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT meta_value FROM meta WHERE meta_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to read {key:?} from the save file"))
    }

    fn get_meta_int(&self, key: &str) -> Result<Option<u64>> {
        match self.get_meta(key)? {
            Some(text) => match text.parse::<u64>() {
                Ok(value) => Ok(Some(value)),
                Err(_) => {
                    warn!("ignoring unparseable value {text:?} stored under {key:?}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

impl StateStore for SqliteStore {
    fn load_board_size(&self) -> Result<Option<u8>> {
        match self.get_meta_int("board_size")? {
            Some(value) => match u8::try_from(value) {
                Ok(size) => Ok(Some(size)),
                Err(_) => {
                    warn!("ignoring stored board size {value}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn load_board(&self, size: u8) -> Result<Option<Vec<String>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT record FROM tiles WHERE board_size = ?1 ORDER BY record")?;
        let records = stmt
            .query_map(params![size as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, rusqlite::Error>>()
            .with_context(|| format!("failed to read the stored {size}x{size} board"))?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records))
        }
    }

    fn load_score(&self, size: u8) -> Result<Option<u64>> {
        self.get_meta_int(&format!("score_{size}"))
    }

    fn load_highscore(&self, size: u8) -> Result<Option<u64>> {
        self.get_meta_int(&format!("highscore_{size}"))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("failed to start a save transaction")?;
        tx.execute("DELETE FROM tiles", [])?;
        {
            let mut insert =
                tx.prepare("INSERT INTO tiles (board_size, record) VALUES (?1, ?2)")?;
            for (size, records) in &snapshot.boards {
                for record in records {
                    insert.execute(params![*size as i64, record])?;
                }
            }
        }
        {
            let mut upsert = tx.prepare(
                "INSERT INTO meta (meta_key, meta_value) VALUES (?1, ?2)
                 ON CONFLICT(meta_key) DO UPDATE SET meta_value=excluded.meta_value",
            )?;
            upsert.execute(params!["board_size", snapshot.board_size.to_string()])?;
            for (size, score) in &snapshot.scores {
                upsert.execute(params![format!("score_{size}"), score.to_string()])?;
            }
            for (size, highscore) in &snapshot.highscores {
                upsert.execute(params![format!("highscore_{size}"), highscore.to_string()])?;
            }
        }
        tx.commit().context("failed to commit the save transaction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            board_size: 4,
            boards: vec![
                (3, vec!["0,0,2".to_string(), "2,1,4".to_string()]),
                (4, vec!["1,1,2".to_string(), "3,3,2".to_string()]),
                (5, vec!["0,4,8".to_string()]),
            ],
            scores: vec![(3, 16), (4, 0), (5, 8)],
            highscores: vec![(3, 128), (4, 0), (5, 8)],
        }
    }

    #[test]
    fn save_then_reload_roundtrip() {
        let td = tempdir().unwrap();
        let path = td.path().join("saves.db");
        let mut store = SqliteStore::open(&path).expect("open save file");
        assert_eq!(store.load_board_size().unwrap(), None);
        assert_eq!(store.load_board(4).unwrap(), None);
        assert_eq!(store.load_score(4).unwrap(), None);

        store.save(&sample_snapshot()).unwrap();
        assert_eq!(store.load_board_size().unwrap(), Some(4));
        assert_eq!(
            store.load_board(3).unwrap(),
            Some(vec!["0,0,2".to_string(), "2,1,4".to_string()])
        );
        assert_eq!(store.load_score(3).unwrap(), Some(16));
        assert_eq!(store.load_score(4).unwrap(), Some(0));
        assert_eq!(store.load_highscore(3).unwrap(), Some(128));
        drop(store);

        // a fresh connection sees the same state on disk
        let store = SqliteStore::open(&path).expect("reopen save file");
        assert_eq!(store.load_board(5).unwrap(), Some(vec!["0,4,8".to_string()]));
        assert_eq!(store.load_highscore(5).unwrap(), Some(8));
    }

    #[test]
    fn second_save_replaces_the_first() {
        let td = tempdir().unwrap();
        let path = td.path().join("saves.db");
        let mut store = SqliteStore::open(&path).expect("open save file");
        store.save(&sample_snapshot()).unwrap();

        let replacement = Snapshot {
            board_size: 3,
            boards: vec![(3, vec![]), (4, vec!["0,0,16".to_string()]), (5, vec![])],
            scores: vec![(3, 0), (4, 99), (5, 0)],
            highscores: vec![(3, 128), (4, 99), (5, 8)],
        };
        store.save(&replacement).unwrap();

        assert_eq!(store.load_board_size().unwrap(), Some(3));
        // boards saved without tiles read back as absent
        assert_eq!(store.load_board(3).unwrap(), None);
        assert_eq!(store.load_board(5).unwrap(), None);
        assert_eq!(store.load_board(4).unwrap(), Some(vec!["0,0,16".to_string()]));
        assert_eq!(store.load_score(4).unwrap(), Some(99));
    }

    #[test]
    fn unparseable_scalars_read_as_absent() {
        let td = tempdir().unwrap();
        let path = td.path().join("saves.db");
        let mut store = SqliteStore::open(&path).expect("open save file");
        store.save(&sample_snapshot()).unwrap();
        drop(store);

        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "UPDATE meta SET meta_value = 'not a number' WHERE meta_key = 'score_3'",
            [],
        )
        .unwrap();
        conn.execute(
            "UPDATE meta SET meta_value = '700' WHERE meta_key = 'board_size'",
            [],
        )
        .unwrap();
        drop(conn);

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load_score(3).unwrap(), None);
        // 700 does not fit a board size
        assert_eq!(store.load_board_size().unwrap(), None);
        assert_eq!(store.load_highscore(3).unwrap(), Some(128));
    }
}
