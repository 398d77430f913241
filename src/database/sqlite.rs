use chrono::{NaiveDate, Weekday};
use rusqlite::Connection;

use crate::{
    timing::{day_off::DayOff, fingerprint::Fingerprint, week_interval::WeekInterval},
    ISO_FORMAT_DATE,
};

/// Queries over the shop tables.
///
/// Every function takes a plain `rusqlite::Connection`, so callers can pass a
/// pooled connection or an open transaction alike.
pub struct SqliteDatabase {}

impl SqliteDatabase {
    /**
    Create the shop, entry and days_off tables if they are missing.

    `entry.day_of_week` is the day the schedule was entered for. A row that
    spills past midnight keeps that day here while its fingerprints carry the
    day it actually falls on.
    */
    pub fn create_tables(connection: &Connection) -> rusqlite::Result<()> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS shop (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS entry (
                id INTEGER PRIMARY KEY,
                shop_id INTEGER NOT NULL REFERENCES shop(id) ON DELETE CASCADE,
                day_of_week INTEGER NOT NULL,
                from_time INTEGER NOT NULL,
                to_time INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS entry_shop_id_day_of_week ON entry (shop_id, day_of_week);
            CREATE TABLE IF NOT EXISTS days_off (
                id INTEGER PRIMARY KEY,
                shop_id INTEGER NOT NULL REFERENCES shop(id) ON DELETE CASCADE,
                from_date TEXT NOT NULL,
                to_date TEXT
            );
            CREATE INDEX IF NOT EXISTS days_off_shop_id_from_date ON days_off (shop_id, from_date);",
        )
    }

    /**
    Insert a shop and return its id.
    */
    pub fn insert_shop(connection: &Connection, title: &str) -> rusqlite::Result<i64> {
        connection.execute("INSERT INTO shop (title) VALUES (?1)", rusqlite::params![title])?;
        Ok(connection.last_insert_rowid())
    }

    /**
    Get the title of a shop.

    Returns an `Ok(None)` if there is no shop with that id.
    */
    pub fn query_shop(connection: &Connection, shop_id: i64) -> rusqlite::Result<Option<String>> {
        let mut statement = connection.prepare("SELECT title FROM shop WHERE id = ?1")?;
        let mut data = statement.query(rusqlite::params![shop_id])?;
        match data.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /**
    Insert compiled rows for one entered day.
    */
    pub fn insert_entries(
        connection: &Connection,
        shop_id: i64,
        day: Weekday,
        rows: &[WeekInterval],
    ) -> rusqlite::Result<()> {
        let mut statement = connection.prepare(
            "INSERT INTO entry (shop_id, day_of_week, from_time, to_time) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for row in rows {
            statement.execute(rusqlite::params![
                shop_id,
                day.num_days_from_monday(),
                row.from_fingerprint().as_u32(),
                row.to_fingerprint().as_u32(),
            ])?;
        }
        Ok(())
    }

    /**
    Replace every row entered for `day` with `rows`.

    The delete and the inserts run in a single transaction so readers never
    see the day half written.
    */
    pub fn replace_day_entries(
        connection: &mut Connection,
        shop_id: i64,
        day: Weekday,
        rows: &[WeekInterval],
    ) -> rusqlite::Result<()> {
        let transaction = connection.transaction()?;
        transaction.execute(
            "DELETE FROM entry WHERE shop_id = ?1 AND day_of_week = ?2",
            rusqlite::params![shop_id, day.num_days_from_monday()],
        )?;
        {
            let mut statement = transaction.prepare(
                "INSERT INTO entry (shop_id, day_of_week, from_time, to_time) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                statement.execute(rusqlite::params![
                    shop_id,
                    day.num_days_from_monday(),
                    row.from_fingerprint().as_u32(),
                    row.to_fingerprint().as_u32(),
                ])?;
            }
        }
        transaction.commit()
    }

    /**
    Get all the rows of a shop, paired with the day they were entered for.

    Rows come back grouped by that day and, within it, in the order they
    were compiled.
    */
    pub fn query_entries(
        connection: &Connection,
        shop_id: i64,
    ) -> rusqlite::Result<Vec<(u8, WeekInterval)>> {
        let mut statement = connection.prepare(
            "SELECT day_of_week, from_time, to_time FROM entry WHERE shop_id = ?1 ORDER BY day_of_week, id",
        )?;
        let rows = statement.query_map(rusqlite::params![shop_id], |row| {
            let day_of_week: u8 = row.get(0)?;
            let from = Self::fingerprint_column(row, 1)?;
            let to = Self::fingerprint_column(row, 2)?;
            Ok((day_of_week, WeekInterval::from_fingerprints(from, to)))
        })?;

        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    /**
    Insert one day off and return its id.
    */
    pub fn insert_day_off(
        connection: &Connection,
        shop_id: i64,
        day_off: &DayOff,
    ) -> rusqlite::Result<i64> {
        connection.execute(
            "INSERT INTO days_off (shop_id, from_date, to_date) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                shop_id,
                day_off.from_date().format(ISO_FORMAT_DATE).to_string(),
                day_off.to_date().map(|date| date.format(ISO_FORMAT_DATE).to_string()),
            ],
        )?;
        Ok(connection.last_insert_rowid())
    }

    /**
    Get every day off of a shop.
    */
    pub fn query_day_offs(connection: &Connection, shop_id: i64) -> rusqlite::Result<Vec<DayOff>> {
        let mut statement = connection.prepare(
            "SELECT from_date, to_date FROM days_off WHERE shop_id = ?1 ORDER BY from_date",
        )?;
        let rows = statement.query_map(rusqlite::params![shop_id], Self::day_off_row)?;
        Self::collect_day_offs(rows)
    }

    /**
    Get the days off of a shop that cover `date`. Dates are stored as
    `%Y-%m-%d` so text comparison orders them correctly.
    */
    pub fn query_active_day_offs(
        connection: &Connection,
        shop_id: i64,
        date: NaiveDate,
    ) -> rusqlite::Result<Vec<DayOff>> {
        let mut statement = connection.prepare(
            "SELECT from_date, to_date FROM days_off
             WHERE shop_id = ?1 AND from_date <= ?2 AND (to_date IS NULL OR to_date >= ?2)",
        )?;
        let date = date.format(ISO_FORMAT_DATE).to_string();
        let rows = statement.query_map(rusqlite::params![shop_id, date], Self::day_off_row)?;
        Self::collect_day_offs(rows)
    }

    fn collect_day_offs(
        rows: impl Iterator<Item = rusqlite::Result<DayOff>>,
    ) -> rusqlite::Result<Vec<DayOff>> {
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    fn day_off_row(row: &rusqlite::Row) -> rusqlite::Result<DayOff> {
        let from_date: String = row.get(0)?;
        let to_date: Option<String> = row.get(1)?;
        let from_date = Self::date_column(&from_date, 0)?;
        let to_date = match to_date {
            Some(to_date) => Some(Self::date_column(&to_date, 1)?),
            None => None,
        };
        DayOff::new(from_date, to_date)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(err)))
    }

    fn date_column(text: &str, index: usize) -> rusqlite::Result<NaiveDate> {
        NaiveDate::parse_from_str(text, ISO_FORMAT_DATE).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
        })
    }

    fn fingerprint_column(row: &rusqlite::Row, index: usize) -> rusqlite::Result<Fingerprint> {
        let value: u32 = row.get(index)?;
        Fingerprint::try_from(value).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Integer, Box::new(err))
        })
    }
}
