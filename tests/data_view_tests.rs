#[cfg(test)]
mod tests {
    use campaign_view::data::data_view::{DataView, SortDirection, StatusFilter};
    use campaign_view::data::datatable::{CampaignStatus, DataColumn, DataRow, DataValue};
    use campaign_view::data::mock_data::{campaign_columns, MockDataGenerator};

    fn reference_view() -> DataView {
        DataView::new(
            "Campaign Performance",
            MockDataGenerator::default().campaigns(),
            campaign_columns(),
        )
    }

    fn names(rows: &[DataRow]) -> Vec<String> {
        rows.iter()
            .map(|r| r.get("name").map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }

    /// 25 rows with a rotating status and a bucketed score
    fn numbered_view() -> DataView {
        let statuses = [
            CampaignStatus::Active,
            CampaignStatus::Paused,
            CampaignStatus::Stopped,
        ];
        let rows = (0..25)
            .map(|i| {
                DataRow::new()
                    .with("name", format!("row-{:02}", i))
                    .with("status", statuses[i % 3])
                    .with("score", (i % 4) as i64)
            })
            .collect();
        let columns = vec![
            DataColumn::new("name", "Name").sortable(),
            DataColumn::new("status", "Status").sortable(),
            DataColumn::new("score", "Score").sortable(),
            DataColumn::new("notes", "Notes"),
        ];
        DataView::new("Numbered", rows, columns)
    }

    #[test]
    fn test_default_view_shows_first_page_in_source_order() {
        let view = reference_view();
        let page = view.get_view();

        assert_eq!(page.total_filtered, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert_eq!(
            names(&page.rows),
            vec![
                "Summer Sale 2024",
                "Brand Awareness Q3",
                "Product Launch Campaign",
                "Holiday Campaign 2024",
                "Back to School"
            ]
        );
        assert_eq!(page.range_label(), "Showing 1 to 5 of 5 results");
    }

    #[test]
    fn test_status_filter_keeps_only_matching_rows() {
        let mut view = numbered_view();
        for status in CampaignStatus::ALL {
            view.set_status_filter(status.as_str());
            let rows = view.filtered_sorted_rows();
            assert!(rows.iter().all(|r| r.status() == Some(status)));
            assert!(rows.len() <= view.rows().len());
        }

        view.set_status_filter("paused");
        let page = view.get_view();
        // 25 rows, every third one paused starting at index 1
        assert_eq!(page.total_filtered, 8);
        assert_eq!(view.state().status_filter, StatusFilter::Only(CampaignStatus::Paused));
    }

    #[test]
    fn test_unrecognized_filter_value_shows_everything() {
        let mut view = reference_view();
        view.set_status_filter("Active");
        assert_eq!(view.state().status_filter, StatusFilter::All);
        assert_eq!(view.get_view().total_filtered, 5);

        view.set_status_filter("archived");
        assert_eq!(view.get_view().total_filtered, 5);
    }

    #[test]
    fn test_sort_toggle_sequence() {
        let mut view = reference_view();

        view.set_sort("roi");
        assert_eq!(view.state().sort_field.as_deref(), Some("roi"));
        assert_eq!(view.state().sort_direction, SortDirection::Ascending);
        assert_eq!(names(&view.get_view().rows)[0], "Back to School");

        view.set_sort("roi");
        assert_eq!(view.state().sort_direction, SortDirection::Descending);
        assert_eq!(names(&view.get_view().rows)[0], "Holiday Campaign 2024");

        // A different field starts ascending again
        view.set_sort("budget");
        assert_eq!(view.state().sort_field.as_deref(), Some("budget"));
        assert_eq!(view.state().sort_direction, SortDirection::Ascending);
        assert_eq!(names(&view.get_view().rows)[0], "Brand Awareness Q3");

        view.set_sort("roi");
        assert_eq!(view.state().sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn test_filter_then_sort_by_roi_descending() {
        let mut view = reference_view();
        view.set_status_filter("active");
        view.set_sort("roi");
        view.set_sort("roi");

        let page = view.get_view();
        assert_eq!(
            names(&page.rows),
            vec!["Holiday Campaign 2024", "Summer Sale 2024", "Brand Awareness Q3"]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut view = numbered_view().with_page_size(25);
        view.set_sort("score");

        let rows = view.get_view().rows;
        for pair in rows.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.get("score") == b.get("score") {
                // Equal keys keep their source order, and names encode that order
                assert!(a.get("name").map(|v| v.to_string()) < b.get("name").map(|v| v.to_string()));
            }
        }

        // Descending keeps ties in source order too
        view.set_sort("score");
        let rows = view.get_view().rows;
        assert_eq!(rows[0].get("score"), Some(&DataValue::Integer(3)));
        assert_eq!(names(&rows[..2]), vec!["row-03", "row-07"]);
    }

    #[test]
    fn test_sort_ignores_unknown_and_unsortable_columns() {
        let mut view = numbered_view();
        view.set_page(2);

        view.set_sort("missing");
        view.set_sort("notes");

        assert_eq!(view.state().sort_field, None);
        assert_eq!(view.state().current_page, 2);
        assert_eq!(names(&view.get_view().rows)[0], "row-10");
    }

    #[test]
    fn test_filter_and_sort_reset_page() {
        let mut view = numbered_view();

        view.set_page(3);
        view.set_status_filter("all");
        assert_eq!(view.state().current_page, 1);

        view.set_page(3);
        view.set_sort("name");
        assert_eq!(view.state().current_page, 1);
    }

    #[test]
    fn test_pagination_over_25_rows() {
        let mut view = numbered_view();

        let page = view.get_view();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows.len(), 10);
        assert!(!page.has_previous());
        assert!(page.has_next());

        view.set_page(3);
        let page = view.get_view();
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.first_item(), 21);
        assert_eq!(page.last_item(), 25);
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.range_label(), "Showing 21 to 25 of 25 results");

        view.set_page(4);
        let page = view.get_view();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 4);
    }

    #[test]
    fn test_page_zero_is_empty() {
        let mut view = numbered_view();
        view.set_page(0);
        let page = view.get_view();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_filtered, 25);
    }

    #[test]
    fn test_total_pages_matches_ceiling() {
        for size in 1..=12 {
            let view = numbered_view().with_page_size(size);
            let page = view.get_view();
            assert_eq!(page.total_pages, 25usize.div_ceil(size));
            assert!(page.rows.len() <= size);
        }
    }

    #[test]
    fn test_empty_filter_result() {
        let rows = vec![
            DataRow::new()
                .with("name", "Only active")
                .with("status", CampaignStatus::Active),
        ];
        let mut view = DataView::new("Empty", rows, campaign_columns());
        view.set_status_filter("stopped");

        let page = view.get_view();
        assert_eq!(page.total_filtered, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.rows.is_empty());
        assert_eq!(page.range_label(), "Showing 0 to 0 of 0 results");
    }

    #[test]
    fn test_set_rows_keeps_view_state() {
        let mut view = numbered_view();
        view.set_status_filter("active");
        view.set_sort("score");
        view.set_page(2);

        let mut rows = view.rows().to_vec();
        rows.truncate(12);
        view.set_rows(rows);

        assert_eq!(view.state().sort_field.as_deref(), Some("score"));
        assert_eq!(view.state().current_page, 2);
        // 12 rows, 4 active, all on page one
        let page = view.get_view();
        assert_eq!(page.total_filtered, 4);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_missing_field_sorts_with_column_default() {
        let rows = vec![
            DataRow::new().with("name", "b").with("spend", 20i64),
            DataRow::new().with("name", "a"),
            DataRow::new().with("name", "c").with("spend", 5i64),
        ];
        let columns = vec![
            DataColumn::new("name", "Name").sortable(),
            DataColumn::new("spend", "Spend")
                .sortable()
                .with_default(DataValue::Integer(0)),
        ];
        let mut view = DataView::new("Defaults", rows, columns);
        view.set_sort("spend");

        assert_eq!(names(&view.get_view().rows), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_sort_column_mixing_numbers_and_text() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(3);
        let rows: Vec<DataRow> = (0..400)
            .map(|i| {
                let n: i64 = rng.gen_range(0..100);
                let roi = if rng.gen_bool(0.5) {
                    DataValue::Integer(n)
                } else {
                    DataValue::Text(format!("{}%", n))
                };
                DataRow::new()
                    .with("name", format!("row-{:03}", i))
                    .with("roi", roi)
            })
            .collect();
        let columns = vec![
            DataColumn::new("name", "Name").sortable(),
            DataColumn::new("roi", "ROI").sortable(),
        ];
        let mut view = DataView::new("Mixed", rows, columns).with_page_size(400);

        view.set_sort("roi");
        let ascending = view.get_view().rows;
        assert_eq!(ascending.len(), 400);
        let numbers: Vec<i64> = ascending
            .iter()
            .take_while(|r| matches!(r.get("roi"), Some(DataValue::Integer(_))))
            .filter_map(|r| match r.get("roi") {
                Some(DataValue::Integer(n)) => Some(*n),
                _ => None,
            })
            .collect();
        assert!(!numbers.is_empty());
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        // Every number comes before every text value
        assert!(ascending[numbers.len()..]
            .iter()
            .all(|r| matches!(r.get("roi"), Some(DataValue::Text(_)))));

        view.set_sort("roi");
        let descending = view.get_view().rows;
        assert_eq!(descending.len(), 400);
        assert!(matches!(descending[0].get("roi"), Some(DataValue::Text(_))));
        assert!(matches!(
            descending[399].get("roi"),
            Some(DataValue::Integer(_))
        ));
    }
}
