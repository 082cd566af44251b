use foundation::{ClusterId, LonLat, RecordId};
use pretty_assertions::assert_eq;
use runtime::Counter;
use scene::{ClusterClick, LeafQueryError};
use viewer::{
    Command, LoadState, Message, NoAssets, RecordingSurface, Session, StaticSource, ViewerConfig,
    startup_messages,
};

const TWO_RECORDS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "geometry": {"type": "Point", "coordinates": [159.95, -9.43]},
     "properties": {
       "Diplomacy_category": "Cultural Diplomacy (Defence)",
       "Delivering_Country": "Australia",
       "Receiving_Countries": "Solomon Islands",
       "Year": 2019,
       "Comments": "Band performance at the national stadium."
     }},
    {"type": "Feature",
     "geometry": {"type": "Point", "coordinates": [178.44, -18.14]},
     "properties": {
       "Diplomacy_category": "Unknown Category XYZ",
       "Delivering_Country": "New Zealand",
       "Receiving_Countries": "Fiji",
       "Year": "2021 "
     }}
  ]
}"#;

fn boot(payload: &str) -> (Session, RecordingSurface) {
    let config = ViewerConfig::default();
    let mut session = Session::new(config.clone());
    let messages = pollster::block_on(startup_messages(
        &config,
        &StaticSource::new(payload),
        &NoAssets,
    ));
    for m in messages {
        session.enqueue(m);
    }
    let mut surface = RecordingSurface::new();
    session.run_pending(&mut surface);
    (session, surface)
}

fn click(cluster: u64, point_count: u32) -> Message {
    Message::ClusterClicked(ClusterClick {
        cluster: ClusterId(cluster),
        point_count,
        center: LonLat::new(170.0, -12.0),
        zoom: 8.0,
    })
}

#[test]
fn filtering_to_one_category_keeps_only_its_record() {
    let (mut session, mut surface) = boot(TWO_RECORDS);
    assert_eq!(session.load_state(), LoadState::Loaded);
    assert_eq!(session.store().len(), 2);
    surface.take();

    session.handle(Message::ToggleCategory {
        label: "Unknown Category XYZ".to_string(),
        included: false,
    });
    let admitted: Vec<RecordId> = session.store().filtered().map(|r| r.id).collect();
    assert_eq!(admitted, vec![RecordId(0)]);

    let cmds = session.handle(Message::ToggleCountry {
        label: "Narnia".to_string(),
        included: false,
    });
    assert!(cmds.is_empty());
    assert_eq!(session.store().filtered_len(), 1);
}

#[test]
fn startup_registers_icons_before_pushing_data() {
    let (_, mut surface) = boot(TWO_RECORDS);
    let cmds = surface.take();
    let first_data = cmds
        .iter()
        .position(|c| matches!(c, Command::SetSourceData { .. }))
        .expect("marker data");
    let last_image = cmds
        .iter()
        .rposition(|c| matches!(c, Command::RegisterImage(_)))
        .expect("images");
    assert!(last_image < first_data);
    let Command::SetSourceData { data, .. } = &cmds[first_data] else {
        unreachable!()
    };
    let icons: Vec<&str> = data["features"]
        .as_array()
        .expect("features")
        .iter()
        .map(|f| f["properties"]["icon"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(icons, vec!["icon-cultural-diplomacy", "default"]);
}

#[test]
fn filter_change_while_expanded_forces_idle() {
    let (mut session, _) = boot(TWO_RECORDS);
    session.handle(click(3, 2));
    let request = session.pending_leaf_request().expect("request");
    session.handle(Message::ClusterLeaves {
        request,
        result: Ok(vec![RecordId(1), RecordId(0)]),
    });
    assert!(session.expansion().is_some());

    let cmds = session.handle(Message::SetSearch("stadium".to_string()));
    assert_eq!(cmds.first(), Some(&Command::ClearSpider));
    assert!(session.machine().is_idle());
    assert_eq!(session.store().filtered_len(), 1);
}

#[test]
fn clicking_the_expanded_cluster_collapses_it() {
    let (mut session, _) = boot(TWO_RECORDS);
    session.handle(click(3, 2));
    let request = session.pending_leaf_request().expect("request");
    session.handle(Message::ClusterLeaves {
        request,
        result: Ok(vec![RecordId(0), RecordId(1)]),
    });

    let cmds = session.handle(click(3, 2));
    assert_eq!(cmds, vec![Command::ClearSpider]);
    assert!(session.machine().is_idle());
    assert_eq!(session.metrics().counter(Counter::ClustersExpanded), 1);
    assert_eq!(session.metrics().counter(Counter::ClustersCollapsed), 1);
}

#[test]
fn superseded_and_failed_leaf_responses_change_nothing() {
    let (mut session, _) = boot(TWO_RECORDS);
    session.handle(click(3, 2));
    let first = session.pending_leaf_request().expect("request");
    session.handle(click(4, 2));
    let second = session.pending_leaf_request().expect("request");

    let cmds = session.handle(Message::ClusterLeaves {
        request: first,
        result: Ok(vec![RecordId(0)]),
    });
    assert!(cmds.is_empty());
    assert!(session.machine().is_idle());

    let cmds = session.handle(Message::ClusterLeaves {
        request: second,
        result: Err(LeafQueryError::new("source removed")),
    });
    assert!(cmds.is_empty());
    assert!(session.machine().is_idle());
    assert_eq!(session.metrics().counter(Counter::StaleLeafResponses), 1);
    assert_eq!(session.metrics().counter(Counter::LeafQueriesFailed), 1);
}

#[test]
fn low_zoom_click_eases_instead_of_expanding() {
    let (mut session, _) = boot(TWO_RECORDS);
    let cmds = session.handle(Message::ClusterClicked(ClusterClick {
        cluster: ClusterId(1),
        point_count: 2,
        center: LonLat::new(170.0, -12.0),
        zoom: 3.5,
    }));
    assert_eq!(
        cmds,
        vec![Command::EaseTo {
            center: LonLat::new(170.0, -12.0),
            zoom: 4.5
        }]
    );
    assert!(session.pending_leaf_request().is_none());
}

#[test]
fn data_failure_leaves_the_session_unloaded() {
    let (mut session, mut surface) = boot(r#"{"type":"Topology"}"#);
    assert_eq!(session.load_state(), LoadState::NotLoaded);
    assert_eq!(session.metrics().counter(Counter::DataLoadFailures), 1);
    assert!(
        !surface
            .take()
            .iter()
            .any(|c| matches!(c, Command::SetSourceData { .. }))
    );
    assert!(session.handle(click(1, 2)).is_empty());
}
