/// Database module for class and weekly schedule data

mod error;
mod types;

pub use error::StoreError;
pub use types::NewClass;

use crate::schedule::{ClassId, ClassStatus, ExistingClass, TimeSlot};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};
use types::DbClassRow;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_classes.sql");

/// Read-only access to existing classes, as needed by the conflict checker.
///
/// Implementations return classes in a stable order (the checker reports
/// conflicts in that order) and only classes whose status is `active`.
#[async_trait]
pub trait ClassStore: Send + Sync {
    /// Active classes held in `classroom`, minus `exclude` if given.
    async fn find_active_classes_by_room(
        &self,
        classroom: &str,
        exclude: Option<ClassId>,
    ) -> Result<Vec<ExistingClass>, StoreError>;

    /// Active classes taught by `instructor_id`, minus `exclude` if given.
    async fn find_active_classes_by_instructor(
        &self,
        instructor_id: &str,
        exclude: Option<ClassId>,
    ) -> Result<Vec<ExistingClass>, StoreError>;
}

#[derive(Debug, Clone, Copy)]
enum ClassFilter {
    Classroom,
    Instructor,
}

impl ClassFilter {
    fn column(self) -> &'static str {
        match self {
            ClassFilter::Classroom => "c.classroom",
            ClassFilter::Instructor => "c.main_instructor_id",
        }
    }
}

const CLASS_SELECT: &str = "SELECT c.id, c.name, c.classroom, c.main_instructor_id, c.status,
                s.day_of_week, s.start_time, s.end_time
         FROM classes c
         LEFT JOIN class_schedules s ON s.class_id = c.id";

const CLASS_ORDER: &str = "ORDER BY c.id, s.id";

pub struct SqliteClassStore {
    db: Mutex<Connection>,
}

impl SqliteClassStore {
    /// Opens (or creates) the database at `db_path` and initializes the schema
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(db_path)?)
    }

    /// Creates a private in-memory database, mostly useful for tests
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Inserts a class with all of its schedules in one transaction
    pub fn create_class(&self, class: &NewClass) -> Result<ClassId, StoreError> {
        let mut db = self.lock()?;
        let tx = db.transaction()?;
        let now = chrono::Utc::now();

        tx.execute(
            "INSERT INTO classes (name, classroom, main_instructor_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                class.name,
                class.classroom,
                class.main_instructor_id,
                class.status.as_str(),
                now
            ],
        )?;
        let class_id = tx.last_insert_rowid();

        insert_schedules(&tx, class_id, &class.schedules, now)?;
        tx.commit()?;

        Ok(class_id)
    }

    /// Replaces every schedule of an existing class
    pub fn replace_schedules(
        &self,
        class_id: ClassId,
        schedules: &[TimeSlot],
    ) -> Result<(), StoreError> {
        let mut db = self.lock()?;
        let tx = db.transaction()?;

        let exists: Option<i64> = tx
            .query_row("SELECT id FROM classes WHERE id = ?1", [class_id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound { id: class_id });
        }

        tx.execute("DELETE FROM class_schedules WHERE class_id = ?1", [class_id])?;
        insert_schedules(&tx, class_id, schedules, chrono::Utc::now())?;
        tx.commit()?;

        Ok(())
    }

    /// Overwrites a class's fields and schedules in one transaction
    pub fn update_class(&self, class_id: ClassId, class: &NewClass) -> Result<(), StoreError> {
        let mut db = self.lock()?;
        let tx = db.transaction()?;

        let updated = tx.execute(
            "UPDATE classes SET name = ?1, classroom = ?2, main_instructor_id = ?3, status = ?4
             WHERE id = ?5",
            params![
                class.name,
                class.classroom,
                class.main_instructor_id,
                class.status.as_str(),
                class_id
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound { id: class_id });
        }

        tx.execute("DELETE FROM class_schedules WHERE class_id = ?1", [class_id])?;
        insert_schedules(&tx, class_id, &class.schedules, chrono::Utc::now())?;
        tx.commit()?;

        Ok(())
    }

    /// Deletes a class; its schedules go with it through the foreign key
    pub fn delete_class(&self, class_id: ClassId) -> Result<(), StoreError> {
        let db = self.lock()?;
        let deleted = db.execute("DELETE FROM classes WHERE id = ?1", [class_id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound { id: class_id });
        }
        Ok(())
    }

    /// Gets a single class with its schedules, regardless of status
    pub fn get_class(&self, class_id: ClassId) -> Result<Option<ExistingClass>, StoreError> {
        let db = self.lock()?;
        let sql = format!("{CLASS_SELECT} WHERE c.id = ?1 {CLASS_ORDER}");
        let rows = query_rows(&db, &sql, params![class_id])?;
        Ok(group_rows(rows)?.into_iter().next())
    }

    /// Gets every class with its schedules, ordered by id
    pub fn list_classes(&self) -> Result<Vec<ExistingClass>, StoreError> {
        let db = self.lock()?;
        let sql = format!("{CLASS_SELECT} {CLASS_ORDER}");
        let rows = query_rows(&db, &sql, [])?;
        group_rows(rows)
    }

    fn find_active(
        &self,
        filter: ClassFilter,
        value: &str,
        exclude: Option<ClassId>,
    ) -> Result<Vec<ExistingClass>, StoreError> {
        let db = self.lock()?;
        let sql = format!(
            "{CLASS_SELECT}
             WHERE {} = ?1 AND c.status = 'active' AND (?2 IS NULL OR c.id != ?2)
             {CLASS_ORDER}",
            filter.column()
        );
        let rows = query_rows(&db, &sql, params![value, exclude])?;
        group_rows(rows)
    }
}

#[async_trait]
impl ClassStore for SqliteClassStore {
    async fn find_active_classes_by_room(
        &self,
        classroom: &str,
        exclude: Option<ClassId>,
    ) -> Result<Vec<ExistingClass>, StoreError> {
        self.find_active(ClassFilter::Classroom, classroom, exclude)
    }

    async fn find_active_classes_by_instructor(
        &self,
        instructor_id: &str,
        exclude: Option<ClassId>,
    ) -> Result<Vec<ExistingClass>, StoreError> {
        self.find_active(ClassFilter::Instructor, instructor_id, exclude)
    }
}

fn insert_schedules(
    tx: &rusqlite::Transaction<'_>,
    class_id: ClassId,
    schedules: &[TimeSlot],
    now: chrono::DateTime<chrono::Utc>,
) -> Result<(), StoreError> {
    let mut stmt = tx.prepare(
        "INSERT INTO class_schedules (class_id, day_of_week, start_time, end_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for slot in schedules {
        stmt.execute(params![
            class_id,
            i64::from(slot.day_of_week),
            slot.start_time.to_string(),
            slot.end_time.to_string(),
            now
        ])?;
    }
    Ok(())
}

fn query_rows<P: rusqlite::Params>(
    db: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<DbClassRow>, StoreError> {
    let mut stmt = db.prepare(sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok(DbClassRow {
            id: row.get(0)?,
            name: row.get(1)?,
            classroom: row.get(2)?,
            main_instructor_id: row.get(3)?,
            status: row.get(4)?,
            day_of_week: row.get(5)?,
            start_time: row.get(6)?,
            end_time: row.get(7)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Folds joined rows (already ordered by class id) into classes with nested schedules
fn group_rows(rows: Vec<DbClassRow>) -> Result<Vec<ExistingClass>, StoreError> {
    let mut classes: Vec<ExistingClass> = Vec::new();

    for row in rows {
        if classes.last().map(|c| c.id) != Some(row.id) {
            let status = ClassStatus::parse(&row.status).ok_or_else(|| StoreError::CorruptRow {
                table: "classes",
                message: format!("unknown status '{}' for class {}", row.status, row.id),
            })?;
            classes.push(ExistingClass {
                id: row.id,
                name: row.name.clone(),
                classroom: row.classroom.clone(),
                main_instructor_id: row.main_instructor_id.clone(),
                status,
                schedules: Vec::new(),
            });
        }

        // LEFT JOIN yields a single all-NULL schedule for classes without any
        if let (Some(day), Some(start), Some(end)) = (row.day_of_week, row.start_time, row.end_time)
        {
            let slot = TimeSlot::parse(day, &start, &end).map_err(|e| StoreError::CorruptRow {
                table: "class_schedules",
                message: format!("class {}: {}", row.id, e),
            })?;
            if let Some(class) = classes.last_mut() {
                class.schedules.push(slot);
            }
        }
    }

    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: i64, start: &str, end: &str) -> TimeSlot {
        TimeSlot::parse(day, start, end).unwrap()
    }

    fn new_class(name: &str, room: &str, instructor: &str, status: ClassStatus) -> NewClass {
        NewClass {
            name: name.to_string(),
            classroom: Some(room.to_string()),
            main_instructor_id: Some(instructor.to_string()),
            status,
            schedules: vec![slot(1, "14:00", "15:00"), slot(3, "14:00", "15:00")],
        }
    }

    #[tokio::test]
    async fn test_find_active_by_room_filters_status_and_exclusion() {
        let store = SqliteClassStore::in_memory().unwrap();
        let a = store
            .create_class(&new_class("수학A", "201호", "t1", ClassStatus::Active))
            .unwrap();
        store
            .create_class(&new_class("수학B", "201호", "t2", ClassStatus::Inactive))
            .unwrap();
        let c = store
            .create_class(&new_class("영어A", "201호", "t3", ClassStatus::Active))
            .unwrap();
        store
            .create_class(&new_class("과학A", "202호", "t1", ClassStatus::Active))
            .unwrap();

        let found = store.find_active_classes_by_room("201호", None).await.unwrap();
        let ids: Vec<_> = found.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(found[0].schedules.len(), 2);

        let found = store
            .find_active_classes_by_room("201호", Some(a))
            .await
            .unwrap();
        assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![c]);
    }

    #[tokio::test]
    async fn test_find_active_by_instructor() {
        let store = SqliteClassStore::in_memory().unwrap();
        let a = store
            .create_class(&new_class("수학A", "201호", "t1", ClassStatus::Active))
            .unwrap();
        store
            .create_class(&new_class("수학B", "202호", "t1", ClassStatus::Preparing))
            .unwrap();

        let found = store
            .find_active_classes_by_instructor("t1", None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a);
        assert_eq!(found[0].main_instructor_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_replace_schedules_and_get() {
        let store = SqliteClassStore::in_memory().unwrap();
        let id = store
            .create_class(&new_class("수학A", "201호", "t1", ClassStatus::Active))
            .unwrap();

        store
            .replace_schedules(id, &[slot(5, "18:00", "19:30")])
            .unwrap();
        let class = store.get_class(id).unwrap().unwrap();
        assert_eq!(class.schedules, vec![slot(5, "18:00", "19:30")]);

        assert!(matches!(
            store.replace_schedules(999, &[]),
            Err(StoreError::NotFound { id: 999 })
        ));
        assert!(store.get_class(999).unwrap().is_none());
    }

    #[test]
    fn test_class_without_schedules_is_listed() {
        let store = SqliteClassStore::in_memory().unwrap();
        let mut class = new_class("빈반", "203호", "t9", ClassStatus::Active);
        class.schedules.clear();
        let id = store.create_class(&class).unwrap();

        let all = store.list_classes().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert!(all[0].schedules.is_empty());
    }

    #[test]
    fn test_update_class_overwrites_fields_and_schedules() {
        let store = SqliteClassStore::in_memory().unwrap();
        let id = store
            .create_class(&new_class("수학A", "201호", "t1", ClassStatus::Preparing))
            .unwrap();

        let mut edited = new_class("수학A+", "305호", "t4", ClassStatus::Active);
        edited.schedules = vec![slot(6, "10:00", "12:00")];
        store.update_class(id, &edited).unwrap();

        let class = store.get_class(id).unwrap().unwrap();
        assert_eq!(class.name, "수학A+");
        assert_eq!(class.classroom.as_deref(), Some("305호"));
        assert_eq!(class.main_instructor_id.as_deref(), Some("t4"));
        assert_eq!(class.status, ClassStatus::Active);
        assert_eq!(class.schedules, vec![slot(6, "10:00", "12:00")]);

        assert!(matches!(
            store.update_class(42, &edited),
            Err(StoreError::NotFound { id: 42 })
        ));
    }

    #[tokio::test]
    async fn test_delete_class_removes_schedules() {
        let store = SqliteClassStore::in_memory().unwrap();
        let id = store
            .create_class(&new_class("수학A", "201호", "t1", ClassStatus::Active))
            .unwrap();

        store.delete_class(id).unwrap();
        assert!(store.get_class(id).unwrap().is_none());
        assert!(store
            .find_active_classes_by_room("201호", None)
            .await
            .unwrap()
            .is_empty());

        let db = store.lock().unwrap();
        let orphans: i64 = db
            .query_row("SELECT COUNT(*) FROM class_schedules", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
        drop(db);

        assert!(matches!(
            store.delete_class(id),
            Err(StoreError::NotFound { .. })
        ));
    }
}
