//! A dashboard session: ingests sources through the dataset cache and holds
//! the parameters the views are recomputed for.

use crate::sources::SourcePaths;
use chrono::NaiveDate;
use pulse_cache::{DatasetCache, SourceFingerprint};
use pulse_core::config::OrdersScope;
use pulse_core::{DateRange, PulseResult};
use pulse_ingest::{Dataset, Ingestor};
use pulse_reporting::DashboardQuery;
use std::sync::Arc;
use tracing::info;

pub struct Session {
    paths: SourcePaths,
    ingestor: Ingestor,
    cache: DatasetCache,
    current: Option<SourceFingerprint>,
    /// Marketing date span of the last loaded dataset.
    available: Option<DateRange>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub orders_scope: OrdersScope,
}

impl Session {
    pub fn new(paths: SourcePaths, ingestor: Ingestor, cache: DatasetCache) -> Self {
        Self {
            paths,
            ingestor,
            cache,
            current: None,
            available: None,
            start: None,
            end: None,
            orders_scope: OrdersScope::default(),
        }
    }

    /// Read the sources and return the ingested dataset. Unchanged content
    /// is served from the cache; changed content drops the previous entry.
    pub fn load(&mut self) -> PulseResult<Arc<Dataset>> {
        let bundle = self.paths.load_bundle()?;
        let fingerprint = SourceFingerprint::of(&bundle, &self.ingestor.settings_token());

        if let Some(previous) = self.current.take() {
            if previous != fingerprint && self.cache.invalidate(&previous) {
                info!(
                    previous = previous.short(),
                    current = fingerprint.short(),
                    "Sources changed, cached dataset invalidated"
                );
            }
        }

        let ingestor = &self.ingestor;
        let dataset = self
            .cache
            .get_or_ingest(&fingerprint, || ingestor.ingest(&bundle))?;
        self.current = Some(fingerprint);
        self.available = dataset.marketing.date_bounds();
        Ok(dataset)
    }

    /// Drop every cached dataset so the next load re-ingests.
    pub fn reload(&mut self) {
        self.cache.clear();
        self.current = None;
    }

    pub fn query(&self, dataset: &Dataset) -> PulseResult<DashboardQuery> {
        Ok(DashboardQuery {
            range: resolve_range(self.start, self.end, dataset.marketing.date_bounds())?,
            orders_scope: self.orders_scope,
        })
    }

    #[cfg(test)]
    pub fn cached_datasets(&self) -> usize {
        self.cache.len()
    }
}

/// Build the active range from optional bounds. A missing bound falls back
/// to the matching end of the available marketing span, or to the other
/// bound when there is no marketing data.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    available: Option<DateRange>,
) -> PulseResult<Option<DateRange>> {
    let (start, end) = match (start, end, available) {
        (None, None, _) => return Ok(None),
        (Some(s), Some(e), _) => (s, e),
        (Some(s), None, Some(a)) => (s, a.end),
        (None, Some(e), Some(a)) => (a.start, e),
        (Some(s), None, None) => (s, s),
        (None, Some(e), None) => (e, e),
    };
    DateRange::new(start, end).map(Some)
}

// ─── Interactive commands ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Range(NaiveDate, NaiveDate),
    Start(NaiveDate),
    End(NaiveDate),
    Reset,
    Scope(OrdersScope),
    Reload,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  range <start> <end>   set the date range (day-first, e.g. 03/04/2024)
  start <date>          set the range start
  end <date>            set the range end
  reset                 use the full span of marketing dates
  scope all|range       which business rows count toward total orders
  reload                re-read every source
  show                  recompute and print the dashboard
  help                  this text
  quit                  exit
";

fn parse_date_word(word: Option<&str>) -> Result<NaiveDate, String> {
    let word = word.ok_or_else(|| "missing date".to_string())?;
    pulse_ingest::dates::parse_day_first(word).ok_or_else(|| format!("'{word}' is not a day-first date"))
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or("show").to_lowercase();
        let command = match verb.as_str() {
            "range" => Command::Range(parse_date_word(words.next())?, parse_date_word(words.next())?),
            "start" => Command::Start(parse_date_word(words.next())?),
            "end" => Command::End(parse_date_word(words.next())?),
            "reset" => Command::Reset,
            "scope" => Command::Scope(words.next().ok_or("missing scope")?.parse()?),
            "reload" => Command::Reload,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };
        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument '{extra}'"));
        }
        Ok(command)
    }
}

impl Session {
    /// Apply a parameter change. Returns `Ok(false)` when the session ends.
    /// A bound that would invert the active range is rejected and leaves the
    /// current parameters unchanged.
    pub fn apply(&mut self, command: &Command) -> PulseResult<bool> {
        match command {
            Command::Range(start, end) => {
                DateRange::new(*start, *end)?;
                self.start = Some(*start);
                self.end = Some(*end);
            }
            Command::Start(start) => {
                resolve_range(Some(*start), self.end, self.available)?;
                self.start = Some(*start);
            }
            Command::End(end) => {
                resolve_range(self.start, Some(*end), self.available)?;
                self.end = Some(*end);
            }
            Command::Reset => {
                self.start = None;
                self.end = None;
            }
            Command::Scope(scope) => self.orders_scope = *scope,
            Command::Reload => self.reload(),
            Command::Show | Command::Help => {}
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn write_sources(dir: &Path, google: &str) -> SourcePaths {
        let header = "Date,Campaign,Impression,Clicks,Spend,Attributed Revenue\n";
        fs::write(dir.join("google.csv"), format!("{header}{google}")).unwrap();
        fs::write(dir.join("facebook.csv"), format!("{header}05/04/2024,B,10,1,2,4\n")).unwrap();
        fs::write(dir.join("tiktok.csv"), header).unwrap();
        fs::write(dir.join("business.csv"), "date,# of orders\n03/04/2024,7\n").unwrap();
        SourcePaths {
            google: dir.join("google.csv"),
            facebook: dir.join("facebook.csv"),
            tiktok: dir.join("tiktok.csv"),
            business: dir.join("business.csv"),
        }
    }

    #[test]
    fn test_resolve_range() {
        let available = Some(DateRange::new(day(1), day(9)).unwrap());
        assert_eq!(resolve_range(None, None, available).unwrap(), None);
        assert_eq!(
            resolve_range(Some(day(3)), None, available).unwrap(),
            Some(DateRange::new(day(3), day(9)).unwrap())
        );
        assert_eq!(
            resolve_range(None, Some(day(4)), available).unwrap(),
            Some(DateRange::new(day(1), day(4)).unwrap())
        );
        assert_eq!(
            resolve_range(Some(day(5)), None, None).unwrap(),
            Some(DateRange::new(day(5), day(5)).unwrap())
        );
        assert!(resolve_range(Some(day(5)), Some(day(2)), available).is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "range 01/04/2024 03/04/2024".parse::<Command>(),
            Ok(Command::Range(day(1), day(3)))
        );
        assert_eq!("start 2024-04-02".parse::<Command>(), Ok(Command::Start(day(2))));
        assert_eq!("scope range".parse::<Command>(), Ok(Command::Scope(OrdersScope::DateRange)));
        assert_eq!("".parse::<Command>(), Ok(Command::Show));
        assert_eq!("Q".parse::<Command>(), Ok(Command::Quit));
        assert!("range 01/04/2024".parse::<Command>().is_err());
        assert!("range 13/13/2024 01/04/2024".parse::<Command>().is_err());
        assert!("reset now".parse::<Command>().is_err());
        assert!("pie".parse::<Command>().is_err());
    }

    #[test]
    fn test_inverted_range_command_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_sources(dir.path(), "");
        let mut session = Session::new(paths, Ingestor::default(), DatasetCache::new(4));
        assert!(session.apply(&Command::Range(day(5), day(1))).is_err());
        assert_eq!(session.start, None);
        assert!(!session.apply(&Command::Quit).unwrap());
    }

    #[test]
    fn test_bound_past_other_bound_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_sources(dir.path(), "02/04/2024,A,100,10,50,150\n");
        let mut session = Session::new(paths, Ingestor::default(), DatasetCache::new(4));
        let dataset = session.load().unwrap();

        session.apply(&Command::Range(day(2), day(5))).unwrap();
        assert!(session.apply(&Command::Start(day(7))).is_err());
        assert!(session.apply(&Command::End(day(1))).is_err());
        assert_eq!(session.start, Some(day(2)));
        assert_eq!(session.end, Some(day(5)));
        assert_eq!(
            session.query(&dataset).unwrap().range,
            Some(DateRange::new(day(2), day(5)).unwrap())
        );
    }

    #[test]
    fn test_start_past_available_end_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_sources(dir.path(), "02/04/2024,A,100,10,50,150\n");
        let mut session = Session::new(paths, Ingestor::default(), DatasetCache::new(4));
        let dataset = session.load().unwrap();

        // data spans 2..=5 April; no explicit end is set
        assert!(session.apply(&Command::Start(day(7))).is_err());
        assert_eq!(session.start, None);
        session.apply(&Command::Start(day(4))).unwrap();
        assert_eq!(
            session.query(&dataset).unwrap().range,
            Some(DateRange::new(day(4), day(5)).unwrap())
        );
    }

    #[test]
    fn test_load_uses_cache_and_invalidates_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_sources(dir.path(), "03/04/2024,A,100,10,50,150\n");
        let mut session = Session::new(paths, Ingestor::default(), DatasetCache::new(4));

        let first = session.load().unwrap();
        let second = session.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(session.cached_datasets(), 1);

        write_sources(dir.path(), "03/04/2024,A,100,10,60,150\n");
        let third = session.load().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(session.cached_datasets(), 1);
        assert_eq!(third.marketing.records()[0].spend, Some(60.0));
    }

    #[test]
    fn test_query_follows_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_sources(dir.path(), "03/04/2024,A,100,10,50,150\n");
        let mut session = Session::new(paths, Ingestor::default(), DatasetCache::new(4));
        let dataset = session.load().unwrap();

        assert_eq!(session.query(&dataset).unwrap().range, None);
        session.apply(&Command::Start(day(4))).unwrap();
        session.apply(&Command::Scope(OrdersScope::DateRange)).unwrap();
        let query = session.query(&dataset).unwrap();
        assert_eq!(query.range, Some(DateRange::new(day(4), day(5)).unwrap()));
        assert_eq!(query.orders_scope, OrdersScope::DateRange);
    }

    #[test]
    fn test_missing_source_is_awaiting_input() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_sources(dir.path(), "");
        fs::remove_file(&paths.tiktok).unwrap();
        let mut session = Session::new(paths, Ingestor::default(), DatasetCache::new(4));
        let err = session.load().unwrap_err();
        assert!(err.is_awaiting_input());
        assert_eq!(session.cached_datasets(), 0);
    }
}
