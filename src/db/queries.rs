use chrono::{NaiveDateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection};

use crate::models::listing::{
    AdventureRow, CarRow, EmptyLegRow, HelicopterRow, JetRow, YachtRow,
};
use crate::models::{
    CategoryQuery, Conversation, ConversationMessage, ConversationSlots, DialogueState,
};

// ── Conversations ──

pub fn get_conversation(
    conn: &Connection,
    session_id: &str,
) -> anyhow::Result<Option<Conversation>> {
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut stmt = conn.prepare(
        "SELECT session_id, payload, state, last_activity, expires_at
         FROM conversations WHERE session_id = ?1 AND expires_at > ?2",
    )?;

    let result = stmt.query_row(params![session_id, now], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    });

    match result {
        Ok((session_id, payload_json, state_str, last_activity_str, expires_at_str)) => {
            let payload: serde_json::Value =
                serde_json::from_str(&payload_json).unwrap_or(serde_json::json!({}));

            let messages: Vec<ConversationMessage> = payload
                .get("messages")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_default();
            let slots: ConversationSlots = payload
                .get("slots")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_default();

            let last_activity =
                NaiveDateTime::parse_from_str(&last_activity_str, "%Y-%m-%d %H:%M:%S")
                    .unwrap_or_else(|_| Utc::now().naive_utc());
            let expires_at = NaiveDateTime::parse_from_str(&expires_at_str, "%Y-%m-%d %H:%M:%S")
                .unwrap_or_else(|_| Utc::now().naive_utc());

            Ok(Some(Conversation {
                session_id,
                messages,
                state: DialogueState::parse(&state_str),
                slots,
                last_activity,
                expires_at,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_conversation(conn: &Connection, conv: &Conversation) -> anyhow::Result<()> {
    let payload = serde_json::json!({
        "messages": conv.messages,
        "slots": conv.slots,
    });
    let payload_json = serde_json::to_string(&payload)?;
    let last_activity = conv.last_activity.format("%Y-%m-%d %H:%M:%S").to_string();
    let expires_at = conv.expires_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO conversations (session_id, payload, state, last_activity, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(session_id) DO UPDATE SET
           payload = excluded.payload,
           state = excluded.state,
           last_activity = excluded.last_activity,
           expires_at = excluded.expires_at",
        params![
            conv.session_id,
            payload_json,
            conv.state.as_str(),
            last_activity,
            expires_at
        ],
    )?;
    Ok(())
}

pub fn expire_old_conversations(conn: &Connection) -> anyhow::Result<usize> {
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
    let count = conn.execute(
        "DELETE FROM conversations WHERE expires_at <= ?1",
        params![now],
    )?;
    Ok(count)
}

// ── Inventory search ──
//
// Each function builds one filtered SELECT for its category table. The
// WHERE clause is assembled dynamically so absent filter fields simply
// add no predicate.

struct QueryBuilder {
    clauses: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl QueryBuilder {
    fn new() -> Self {
        Self {
            clauses: vec![],
            params: vec![],
        }
    }

    fn min_capacity(&mut self, column: &str, passengers: Option<i64>) {
        if let Some(n) = passengers {
            self.clauses.push(format!("{column} >= ?"));
            self.params.push(Box::new(n));
        }
    }

    /// Row matches when the column contains any of the expanded terms.
    fn location_like(&mut self, column: &str, terms: &[String]) {
        if terms.is_empty() {
            return;
        }
        let ors: Vec<String> = terms.iter().map(|_| format!("{column} LIKE ?")).collect();
        self.clauses.push(format!("({})", ors.join(" OR ")));
        for term in terms {
            self.params.push(Box::new(format!("%{term}%")));
        }
    }

    fn text_like(&mut self, columns: &[&str], text: Option<&str>) {
        let Some(text) = text else { return };
        if text.trim().is_empty() {
            return;
        }
        let ors: Vec<String> = columns.iter().map(|c| format!("{c} LIKE ?")).collect();
        self.clauses.push(format!("({})", ors.join(" OR ")));
        for _ in columns {
            self.params.push(Box::new(format!("%{}%", text.trim())));
        }
    }

    fn date_range(&mut self, column: &str, from: Option<chrono::NaiveDate>, to: Option<chrono::NaiveDate>) {
        if let Some(from) = from {
            self.clauses.push(format!("{column} >= ?"));
            self.params.push(Box::new(from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = to {
            self.clauses.push(format!("{column} <= ?"));
            self.params.push(Box::new(to.format("%Y-%m-%d").to_string()));
        }
    }

    fn build(mut self, base: &str, order: &str, limit: i64) -> (String, Vec<Box<dyn ToSql>>) {
        let mut sql = base.to_string();
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        sql.push_str(&format!(" ORDER BY {order} LIMIT ?"));
        self.params.push(Box::new(limit));
        (sql, self.params)
    }
}

fn run_query<T, F>(
    conn: &Connection,
    sql: &str,
    params: &[Box<dyn ToSql>],
    map: F,
) -> anyhow::Result<Vec<T>>
where
    F: Fn(&rusqlite::Row) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| map(row))?;

    let mut out = vec![];
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Departure-side terms take precedence for flight categories whose only
/// location column is the home base; destination terms are the fallback.
fn base_terms(q: &CategoryQuery) -> &[String] {
    if !q.from_terms.is_empty() {
        &q.from_terms
    } else {
        &q.location_terms
    }
}

pub fn search_jets(conn: &Connection, q: &CategoryQuery) -> anyhow::Result<Vec<JetRow>> {
    let mut builder = QueryBuilder::new();
    builder.min_capacity("capacity", q.passengers);
    builder.location_like("home_base", base_terms(q));
    if q.location_terms.is_empty() && q.from_terms.is_empty() {
        builder.text_like(&["name", "description"], q.text.as_deref());
    }

    let (sql, params) = builder.build(
        "SELECT id, name, home_base, capacity, hourly_rate, price, currency, images FROM aircraft",
        "created_at DESC",
        q.limit,
    );

    run_query(conn, &sql, &params, |row| {
        Ok(JetRow {
            id: row.get(0)?,
            name: row.get(1)?,
            home_base: row.get(2)?,
            capacity: row.get(3)?,
            hourly_rate: row.get(4)?,
            price: row.get(5)?,
            currency: row.get(6)?,
            images: row.get(7)?,
        })
    })
}

pub fn search_empty_legs(conn: &Connection, q: &CategoryQuery) -> anyhow::Result<Vec<EmptyLegRow>> {
    let mut builder = QueryBuilder::new();
    builder.min_capacity("seats", q.passengers);
    builder.location_like("from_location", &q.from_terms);
    builder.location_like("to_location", &q.location_terms);
    builder.date_range("departure_date", q.date_from, q.date_to);
    if q.location_terms.is_empty() && q.from_terms.is_empty() {
        builder.text_like(&["aircraft_name"], q.text.as_deref());
    }

    let (sql, params) = builder.build(
        "SELECT id, aircraft_name, from_location, to_location, departure_date, seats, price, currency, images FROM empty_legs",
        "departure_date ASC",
        q.limit,
    );

    run_query(conn, &sql, &params, |row| {
        Ok(EmptyLegRow {
            id: row.get(0)?,
            aircraft_name: row.get(1)?,
            from_location: row.get(2)?,
            to_location: row.get(3)?,
            departure_date: row.get(4)?,
            seats: row.get(5)?,
            price: row.get(6)?,
            currency: row.get(7)?,
            images: row.get(8)?,
        })
    })
}

pub fn search_helicopters(
    conn: &Connection,
    q: &CategoryQuery,
) -> anyhow::Result<Vec<HelicopterRow>> {
    let mut builder = QueryBuilder::new();
    builder.min_capacity("capacity", q.passengers);
    builder.location_like("home_base", base_terms(q));
    if q.location_terms.is_empty() && q.from_terms.is_empty() {
        builder.text_like(&["name", "description"], q.text.as_deref());
    }

    let (sql, params) = builder.build(
        "SELECT id, name, home_base, capacity, price_per_hour, price, currency, images FROM helicopters",
        "created_at DESC",
        q.limit,
    );

    run_query(conn, &sql, &params, |row| {
        Ok(HelicopterRow {
            id: row.get(0)?,
            name: row.get(1)?,
            home_base: row.get(2)?,
            capacity: row.get(3)?,
            price_per_hour: row.get(4)?,
            price: row.get(5)?,
            currency: row.get(6)?,
            images: row.get(7)?,
        })
    })
}

pub fn search_yachts(conn: &Connection, q: &CategoryQuery) -> anyhow::Result<Vec<YachtRow>> {
    let mut builder = QueryBuilder::new();
    builder.min_capacity("guests", q.passengers);
    builder.location_like("home_port", &q.location_terms);
    if q.location_terms.is_empty() {
        builder.text_like(&["name", "description"], q.text.as_deref());
    }

    let (sql, params) = builder.build(
        "SELECT id, name, home_port, guests, price_per_day, price, currency, images FROM yachts",
        "created_at DESC",
        q.limit,
    );

    run_query(conn, &sql, &params, |row| {
        Ok(YachtRow {
            id: row.get(0)?,
            name: row.get(1)?,
            home_port: row.get(2)?,
            guests: row.get(3)?,
            price_per_day: row.get(4)?,
            price: row.get(5)?,
            currency: row.get(6)?,
            images: row.get(7)?,
        })
    })
}

pub fn search_cars(conn: &Connection, q: &CategoryQuery) -> anyhow::Result<Vec<CarRow>> {
    let mut builder = QueryBuilder::new();
    builder.min_capacity("seats", q.passengers);
    builder.location_like("location", &q.location_terms);
    if q.location_terms.is_empty() {
        builder.text_like(&["name", "description"], q.text.as_deref());
    }

    let (sql, params) = builder.build(
        "SELECT id, name, location, seats, price_per_day, price, currency, images FROM cars",
        "created_at DESC",
        q.limit,
    );

    run_query(conn, &sql, &params, |row| {
        Ok(CarRow {
            id: row.get(0)?,
            name: row.get(1)?,
            location: row.get(2)?,
            seats: row.get(3)?,
            price_per_day: row.get(4)?,
            price: row.get(5)?,
            currency: row.get(6)?,
            images: row.get(7)?,
        })
    })
}

pub fn search_adventures(conn: &Connection, q: &CategoryQuery) -> anyhow::Result<Vec<AdventureRow>> {
    // Adventure packages are priced per person, so passenger count is not
    // a hard capacity filter here.
    let mut builder = QueryBuilder::new();
    builder.location_like("location", &q.location_terms);
    if q.location_terms.is_empty() {
        builder.text_like(&["title", "description"], q.text.as_deref());
    }

    let (sql, params) = builder.build(
        "SELECT id, title, location, price, currency, images FROM adventures",
        "created_at DESC",
        q.limit,
    );

    run_query(conn, &sql, &params, |row| {
        Ok(AdventureRow {
            id: row.get(0)?,
            title: row.get(1)?,
            location: row.get(2)?,
            price: row.get(3)?,
            currency: row.get(4)?,
            images: row.get(5)?,
        })
    })
}

// ── Inventory inserts ──

pub fn insert_jet(conn: &Connection, row: &JetRow) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO aircraft (id, name, home_base, capacity, hourly_rate, price, currency, images)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            row.id,
            row.name,
            row.home_base,
            row.capacity,
            row.hourly_rate,
            row.price,
            row.currency,
            row.images
        ],
    )?;
    Ok(())
}

pub fn insert_empty_leg(conn: &Connection, row: &EmptyLegRow) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO empty_legs (id, aircraft_name, from_location, to_location, departure_date, seats, price, currency, images)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            row.id,
            row.aircraft_name,
            row.from_location,
            row.to_location,
            row.departure_date,
            row.seats,
            row.price,
            row.currency,
            row.images
        ],
    )?;
    Ok(())
}

pub fn insert_helicopter(conn: &Connection, row: &HelicopterRow) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO helicopters (id, name, home_base, capacity, price_per_hour, price, currency, images)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            row.id,
            row.name,
            row.home_base,
            row.capacity,
            row.price_per_hour,
            row.price,
            row.currency,
            row.images
        ],
    )?;
    Ok(())
}

pub fn insert_yacht(conn: &Connection, row: &YachtRow) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO yachts (id, name, home_port, guests, price_per_day, price, currency, images)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            row.id,
            row.name,
            row.home_port,
            row.guests,
            row.price_per_day,
            row.price,
            row.currency,
            row.images
        ],
    )?;
    Ok(())
}

pub fn insert_car(conn: &Connection, row: &CarRow) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO cars (id, name, location, seats, price_per_day, price, currency, images)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            row.id,
            row.name,
            row.location,
            row.seats,
            row.price_per_day,
            row.price,
            row.currency,
            row.images
        ],
    )?;
    Ok(())
}

pub fn insert_adventure(conn: &Connection, row: &AdventureRow) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO adventures (id, title, location, price, currency, images)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            row.id,
            row.title,
            row.location,
            row.price,
            row.currency,
            row.images
        ],
    )?;
    Ok(())
}

// ── Custom requests ──

pub fn create_custom_request(
    conn: &Connection,
    id: &str,
    session_id: &str,
    details: &str,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO custom_requests (id, session_id, details) VALUES (?1, ?2, ?3)",
        params![id, session_id, details],
    )?;
    Ok(())
}

pub fn count_custom_requests(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM custom_requests", [], |row| row.get(0))?;
    Ok(count)
}

// ── Admin status ──

pub struct InventoryCounts {
    pub jets: i64,
    pub empty_legs: i64,
    pub helicopters: i64,
    pub yachts: i64,
    pub cars: i64,
    pub adventures: i64,
}

pub fn get_inventory_counts(conn: &Connection) -> anyhow::Result<InventoryCounts> {
    let count = |table: &str| -> anyhow::Result<i64> {
        let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n)
    };

    Ok(InventoryCounts {
        jets: count("aircraft")?,
        empty_legs: count("empty_legs")?,
        helicopters: count("helicopters")?,
        yachts: count("yachts")?,
        cars: count("cars")?,
        adventures: count("adventures")?,
    })
}
