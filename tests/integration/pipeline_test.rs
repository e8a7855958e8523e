//! End-to-end pipeline tests: CSV bytes in, dashboard views out.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pulse_core::config::{BusinessConfig, OrdersScope};
    use pulse_core::{Channel, DateRange, PulseError};
    use pulse_ingest::{Dataset, Ingestor, Source, SourceBundle};
    use pulse_reporting::{DashboardEngine, DashboardQuery};

    const HEADER: &str = "Date,Campaign,Impressions,Clicks,Spend,Attributed Revenue\n";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn bundle(google: &str, facebook: &str, tiktok: &str, business: &str) -> SourceBundle {
        SourceBundle {
            google: Some(Source::from_bytes("google.csv", google)),
            facebook: Some(Source::from_bytes("facebook.csv", facebook)),
            tiktok: Some(Source::from_bytes("tiktok.csv", tiktok)),
            business: Some(Source::from_bytes("business.csv", business)),
        }
    }

    fn ingest(google: &str, facebook: &str, tiktok: &str, business: &str) -> Dataset {
        Ingestor::default()
            .ingest(&bundle(google, facebook, tiktok, business))
            .unwrap()
    }

    fn range(start: u32, end: u32) -> DashboardQuery {
        DashboardQuery {
            range: Some(DateRange::new(day(start), day(end)).unwrap()),
            orders_scope: OrdersScope::AllTime,
        }
    }

    // ─── Single record ──────────────────────────────────────────────────

    #[test]
    fn test_single_record_dashboard() {
        let data = ingest(
            &format!("{HEADER}03/04/2024,A,100,10,50,150\n"),
            HEADER,
            HEADER,
            "Date,# of Orders\n03/04/2024,4\n",
        );
        let engine = DashboardEngine::new(&data);
        let dash = engine.build(&DashboardQuery::default());

        assert_eq!(dash.active_range, Some(DateRange::new(day(3), day(3)).unwrap()));
        assert!((dash.kpis.total_spend - 50.0).abs() < f64::EPSILON);
        assert!((dash.kpis.total_revenue - 150.0).abs() < f64::EPSILON);
        assert_eq!(dash.kpis.total_orders, 4);
        assert_eq!(dash.kpis.mean_roas, Some(3.0));

        assert_eq!(dash.daily.len(), 1);
        assert_eq!(dash.daily[0].date, day(3));
        assert_eq!(dash.channels.len(), 1);
        assert_eq!(dash.channels[0].channel, Channel::Google);
        assert_eq!(dash.channels[0].roas, Some(3.0));
        assert_eq!(dash.campaigns[0].campaign, "A");

        let rows = engine.record_metrics(&DashboardQuery::default());
        assert_eq!(rows[0].ctr, Some(0.1));
        assert_eq!(rows[0].cpc, Some(5.0));
    }

    // ─── Ingestion ──────────────────────────────────────────────────────

    #[test]
    fn test_dates_are_day_first() {
        let data = ingest(
            &format!("{HEADER}03/04/2024,A,1,1,1,1\n"),
            HEADER,
            HEADER,
            "date,orders\n",
        );
        assert_eq!(data.marketing.records()[0].date, day(3));
    }

    #[test]
    fn test_union_keeps_every_row_and_tags_channels() {
        // facebook uses a different column order and the singular "Impression"
        let data = ingest(
            &format!("{HEADER}01/04/2024,A,100,10,10,20\n02/04/2024,B,100,10,10,5\n"),
            "campaign,date,spend,attributed revenue,clicks,impression\nC,01/04/2024,5,15,2,40\nA,04/04/2024,1,1,1,1\nD,05/04/2024,0,0,0,0\n",
            &format!("{HEADER}03/04/2024,E,7,1,2,8\n"),
            "date,#_of_orders\n01/04/2024,2\n",
        );
        let records = data.marketing.records();
        assert_eq!(records.len(), 6);
        let channels: Vec<_> = records.iter().map(|r| r.channel).collect();
        assert_eq!(
            channels,
            vec![
                Channel::Google,
                Channel::Google,
                Channel::Facebook,
                Channel::Facebook,
                Channel::Facebook,
                Channel::Tiktok,
            ]
        );
        assert_eq!(records[2].impressions, Some(40));
        assert_eq!(records[2].campaign, "C");

        let dash = DashboardEngine::new(&data).build(&DashboardQuery::default());
        let spend: f64 = records.iter().filter_map(|r| r.spend).sum();
        let by_channel: f64 = dash.channels.iter().map(|c| c.spend).sum();
        let by_campaign: f64 = dash.campaigns.iter().map(|c| c.spend).sum();
        assert!((spend - dash.kpis.total_spend).abs() < 1e-9);
        assert!((spend - by_channel).abs() < 1e-9);
        assert!((spend - by_campaign).abs() < 1e-9);
        let clicks: u64 = dash.campaigns.iter().map(|c| c.clicks).sum();
        assert_eq!(clicks, 24);
    }

    #[test]
    fn test_missing_sources_are_awaiting_input() {
        let mut sources = bundle(HEADER, HEADER, HEADER, "date,orders\n");
        sources.facebook = None;
        sources.business = None;
        let err = Ingestor::default().ingest(&sources).unwrap_err();
        assert!(err.is_awaiting_input());
        match err {
            PulseError::MissingInput { sources } => assert_eq!(sources, vec!["facebook", "business"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_names_its_source() {
        let err = Ingestor::default()
            .ingest(&bundle(
                HEADER,
                "Date,Campaign,Impressions,Clicks,Attributed Revenue\n",
                HEADER,
                "date,orders\n",
            ))
            .unwrap_err();
        match err {
            PulseError::Schema { source_name, column } => {
                assert_eq!(source_name, "facebook");
                assert_eq!(column, "spend");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_names_source_and_line() {
        let err = Ingestor::default()
            .ingest(&bundle(
                HEADER,
                HEADER,
                &format!("{HEADER}01/04/2024,A,1,1,1,1\n04/13/2024,A,1,1,1,1\n"),
                "date,orders\n",
            ))
            .unwrap_err();
        match err {
            PulseError::DateParse { source_name, line, value } => {
                assert_eq!(source_name, "tiktok");
                assert_eq!(line, 3);
                assert_eq!(value, "04/13/2024");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_business_orders_fallback_column() {
        let ingestor = Ingestor::new(BusinessConfig {
            orders_column: "purchases".to_string(),
            orders_fallbacks: vec!["orders".to_string()],
        });
        let data = ingestor
            .ingest(&bundle(HEADER, HEADER, HEADER, "Date,Orders,New Customers\n01/04/2024,3,1\n"))
            .unwrap();
        assert_eq!(data.business.orders_column(), "orders");
        assert_eq!(data.business.records()[0].orders_count, Some(3));
    }

    // ─── Date range ─────────────────────────────────────────────────────

    fn spread() -> Dataset {
        ingest(
            &format!(
                "{HEADER}01/04/2024,A,10,1,1,1\n02/04/2024,A,10,1,2,2\n03/04/2024,B,10,1,4,4\n04/04/2024,B,10,1,8,8\n05/04/2024,C,10,1,16,16\n"
            ),
            HEADER,
            HEADER,
            "date,orders\n01/04/2024,1\n03/04/2024,10\n30/04/2024,100\n",
        )
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let data = spread();
        let engine = DashboardEngine::new(&data);
        let dash = engine.build(&range(2, 4));
        assert_eq!(dash.filtered_records, 3);
        assert!((dash.kpis.total_spend - 14.0).abs() < f64::EPSILON);
        let dates: Vec<_> = dash.daily.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(2), day(3), day(4)]);
    }

    #[test]
    fn test_orders_scope() {
        let data = spread();
        let engine = DashboardEngine::new(&data);
        assert_eq!(engine.build(&range(2, 4)).kpis.total_orders, 111);

        let scoped = DashboardQuery {
            orders_scope: OrdersScope::DateRange,
            ..range(2, 4)
        };
        assert_eq!(engine.build(&scoped).kpis.total_orders, 10);
    }

    #[test]
    fn test_range_outside_data_is_empty() {
        let data = spread();
        let dash = DashboardEngine::new(&data).build(&range(10, 20));
        assert_eq!(dash.filtered_records, 0);
        assert_eq!(dash.kpis.total_spend, 0.0);
        assert_eq!(dash.kpis.mean_roas, None);
        assert!(dash.campaigns.is_empty());
    }

    // ─── Ratios ─────────────────────────────────────────────────────────

    #[test]
    fn test_zero_spend_rows_do_not_count_toward_mean_roas() {
        let data = ingest(
            &format!("{HEADER}01/04/2024,A,10,0,0,50\n01/04/2024,B,10,1,10,20\n"),
            HEADER,
            HEADER,
            "date,orders\n",
        );
        let dash = DashboardEngine::new(&data).build(&DashboardQuery::default());
        assert_eq!(dash.kpis.mean_roas, Some(2.0));
        // A's campaign ROAS is undefined, so it trails the leaderboard
        assert_eq!(dash.campaigns[0].campaign, "B");
        assert_eq!(dash.campaigns[1].roas, None);
    }

    #[test]
    fn test_leaderboard_sorted_by_roas() {
        let data = ingest(
            &format!("{HEADER}01/04/2024,low,1,1,10,5\n01/04/2024,high,1,1,1,9\n"),
            &format!("{HEADER}01/04/2024,mid,1,1,2,4\n01/04/2024,low,1,1,10,5\n"),
            &format!("{HEADER}01/04/2024,none,1,1,0,0\n"),
            "date,orders\n",
        );
        let dash = DashboardEngine::new(&data).build(&DashboardQuery::default());
        let names: Vec<_> = dash.campaigns.iter().map(|c| c.campaign.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low", "none"]);
        assert_eq!(dash.campaigns[2].roas, Some(0.5));
    }
}
