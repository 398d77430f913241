use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Weekday};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use serde::Serialize;

use crate::{
    config::Config,
    database::sqlite::SqliteDatabase,
    error::{ShopError, ValidationError},
    timing::{
        clock::now_in,
        daily::Daily,
        day_off::DayOff,
        fingerprint::{format_time, weekday_from_index},
        week_interval::WeekInterval,
        working_time::{is_day_off, is_open_at},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shop {
    pub id: i64,
    pub title: String,
}

/// One stored row as shown to owners, times formatted `HH.MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingHours {
    pub from_time: String,
    pub to_time: String,
}

/// Takes a day of week as entered, Monday = 0.
pub fn parse_day_of_week(day_of_week: u8) -> Result<Weekday, ValidationError> {
    if day_of_week > 6 {
        return Err(ValidationError::DayOfWeek(day_of_week));
    }
    Ok(weekday_from_index(day_of_week as u32))
}

/// Everything an owner or a visitor can do with a shop.
///
/// This sits between callers and the store: it validates input, runs the
/// schedule compiler and hands the rows to `SqliteDatabase`. Cloning is cheap,
/// the pool and config are shared.
#[derive(Clone)]
pub struct ShopService {
    connection_pool: Arc<Pool<SqliteConnectionManager>>,
    config: Arc<Config>,
}

impl ShopService {
    pub fn setup(
        connection_pool: Arc<Pool<SqliteConnectionManager>>,
        config: Arc<Config>,
    ) -> Result<Self, ShopError> {
        SqliteDatabase::create_tables(&*connection_pool.get()?)?;
        Ok(Self {
            connection_pool,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, ShopError> {
        Ok(self.connection_pool.get()?)
    }

    fn find_shop(connection: &rusqlite::Connection, shop_id: i64) -> Result<Shop, ShopError> {
        match SqliteDatabase::query_shop(connection, shop_id)? {
            Some(title) => Ok(Shop { id: shop_id, title }),
            None => Err(ShopError::NotFound(shop_id)),
        }
    }

    pub fn shop(&self, shop_id: i64) -> Result<Shop, ShopError> {
        Self::find_shop(&*self.get_connection()?, shop_id)
    }

    /// Creates a shop with the deployment's default week already in place.
    pub fn create_shop(&self, title: &str) -> Result<Shop, ShopError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let mut connection = self.get_connection()?;
        let transaction = connection.transaction()?;
        let id = SqliteDatabase::insert_shop(&transaction, title)?;
        for (day, rows) in self.config.default_schedule.compile() {
            SqliteDatabase::insert_entries(&transaction, id, day, &rows)?;
        }
        transaction.commit()?;

        tracing::info!(shop_id = id, "Created shop '{}' with the default schedule", title);
        Ok(Shop {
            id,
            title: title.to_string(),
        })
    }

    /// Recompiles one day and swaps it in place of the old rows.
    pub fn update_schedule(
        &self,
        shop_id: i64,
        day_of_week: u8,
        daily: &Daily,
    ) -> Result<Vec<WeekInterval>, ShopError> {
        let day = parse_day_of_week(day_of_week)?;
        daily.validate()?;

        let mut connection = self.get_connection()?;
        Self::find_shop(&connection, shop_id)?;

        let rows = daily.compile(day);
        SqliteDatabase::replace_day_entries(&mut connection, shop_id, day, &rows)?;
        tracing::info!(
            shop_id,
            day_of_week,
            rows = rows.len(),
            "Updated schedule to {}-{} with {} breaks",
            daily.opening,
            daily.closing,
            daily.breaks.len()
        );
        Ok(rows)
    }

    /// Closes the shop from `from_date` (today when missing) until `to_date`,
    /// or for good when `to_date` is missing.
    pub fn close(
        &self,
        shop_id: i64,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<DayOff, ShopError> {
        let from_date = from_date.unwrap_or_else(|| now_in(self.config.timezone).date_naive());
        let day_off = DayOff::new(from_date, to_date)?;

        let connection = self.get_connection()?;
        Self::find_shop(&connection, shop_id)?;
        SqliteDatabase::insert_day_off(&connection, shop_id, &day_off)?;
        tracing::info!(shop_id, %from_date, ?to_date, "Shop closed");
        Ok(day_off)
    }

    pub fn day_offs(&self, shop_id: i64) -> Result<Vec<DayOff>, ShopError> {
        let connection = self.get_connection()?;
        Self::find_shop(&connection, shop_id)?;
        Ok(SqliteDatabase::query_day_offs(&connection, shop_id)?)
    }

    pub fn is_day_off(&self, shop_id: i64) -> Result<bool, ShopError> {
        let now = now_in(self.config.timezone);
        let connection = self.get_connection()?;
        Self::find_shop(&connection, shop_id)?;
        let day_offs = SqliteDatabase::query_active_day_offs(&connection, shop_id, now.date_naive())?;
        Ok(is_day_off(&day_offs, &now))
    }

    pub fn is_working(&self, shop_id: i64) -> Result<bool, ShopError> {
        self.is_working_at(shop_id, &now_in(self.config.timezone))
    }

    /// Whether the shop is open at `instant`, read on the deployment's clock.
    pub fn is_working_at<Tz: TimeZone>(
        &self,
        shop_id: i64,
        instant: &DateTime<Tz>,
    ) -> Result<bool, ShopError> {
        let instant = instant.with_timezone(&self.config.timezone);
        let connection = self.get_connection()?;
        Self::find_shop(&connection, shop_id)?;

        let day_offs =
            SqliteDatabase::query_active_day_offs(&connection, shop_id, instant.date_naive())?;
        let intervals: Vec<WeekInterval> = SqliteDatabase::query_entries(&connection, shop_id)?
            .into_iter()
            .map(|(_, interval)| interval)
            .collect();

        let working = is_open_at(&intervals, &day_offs, &instant);
        tracing::debug!(shop_id, %instant, working, "Checked working time");
        Ok(working)
    }

    /// The stored rows grouped by the day they were entered for.
    pub fn schedule(&self, shop_id: i64) -> Result<BTreeMap<u8, Vec<WorkingHours>>, ShopError> {
        let connection = self.get_connection()?;
        Self::find_shop(&connection, shop_id)?;

        let mut result: BTreeMap<u8, Vec<WorkingHours>> = BTreeMap::new();
        for (day_of_week, interval) in SqliteDatabase::query_entries(&connection, shop_id)? {
            result.entry(day_of_week).or_default().push(WorkingHours {
                from_time: format_time(interval.from_fingerprint()),
                to_time: format_time(interval.to_fingerprint()),
            });
        }
        Ok(result)
    }
}
