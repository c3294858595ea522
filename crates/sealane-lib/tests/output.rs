use sealane_lib::{
    Coordinate, Error, Port, RouteOptions, RouteRenderMode, RouteSummary,
};

mod common;

fn diamond_summary() -> RouteSummary {
    let engine = common::diamond_engine();
    let origin = Coordinate::new(-1.0, 0.0);
    let destination = Coordinate::new(2.0, 0.1);
    let (from, to) = engine.resolve_ports(&origin, &destination);
    let routes = engine.calculate_routes(origin, destination, &RouteOptions::default());
    RouteSummary::new(from, to, routes).expect("summary builds")
}

#[test]
fn summary_rejects_empty_route_lists() {
    let port = Port::new("Solo", "", "", Coordinate::new(0.0, 0.0));
    let err = RouteSummary::new(&port, &port, Vec::new()).expect_err("empty routes");
    assert!(matches!(err, Error::EmptyRouteList));
}

#[test]
fn render_modes_include_expected_tokens() {
    let summary = diamond_summary();

    let plain = summary.render(RouteRenderMode::PlainText);
    assert!(plain.starts_with("Routes: Westport -> Eastport (2 options)"));
    assert!(plain.contains("risk: high"));
    assert!(plain.contains("via: Westport -> West Point -> South Passage -> East Point"));

    let rich = summary.render(RouteRenderMode::RichText);
    assert!(rich.contains("**Routes**"));
    assert!(rich.contains("| **Safest Route** (`safest`)"));

    let note = summary.render(RouteRenderMode::Note);
    assert!(note.starts_with("Westport -> Eastport:"));
    assert_eq!(note.lines().count(), 3);
}

#[test]
fn geojson_has_one_linestring_per_route() {
    let summary = diamond_summary();
    let geojson = summary.to_geojson();

    assert_eq!(geojson["type"], "FeatureCollection");
    let features = geojson["features"].as_array().expect("features array");
    assert_eq!(features.len(), summary.routes.len());

    let first = &features[0];
    assert_eq!(first["geometry"]["type"], "LineString");
    assert_eq!(first["properties"]["id"], "fastest");
    assert_eq!(first["properties"]["risk"], "high");
    let coordinates = first["geometry"]["coordinates"]
        .as_array()
        .expect("coordinates");
    assert_eq!(coordinates[0], serde_json::json!([-1.0, 0.0]));
    assert_eq!(coordinates.len(), summary.routes[0].waypoints.len());
    assert_eq!(geojson["properties"]["origin"]["name"], "Westport");
}

#[test]
fn geojson_splits_routes_crossing_the_antimeridian() {
    let engine = common::default_engine();
    let tokyo = Coordinate::new(139.77, 35.62);
    let vancouver = Coordinate::new(-123.11, 49.29);
    let (from, to) = engine.resolve_ports(&tokyo, &vancouver);
    let routes = engine.calculate_routes(tokyo, vancouver, &RouteOptions::default());
    let summary = RouteSummary::new(from, to, routes).expect("summary builds");

    let geojson = summary.to_geojson();
    let fastest = &geojson["features"][0];
    assert_eq!(fastest["properties"]["id"], "fastest");
    assert_eq!(fastest["geometry"]["type"], "MultiLineString");

    let parts = fastest["geometry"]["coordinates"]
        .as_array()
        .expect("line parts");
    assert_eq!(parts.len(), 2);
    for part in parts {
        for point in part.as_array().expect("points") {
            let lon = point[0].as_f64().expect("longitude");
            assert!((-180.0..=180.0).contains(&lon), "longitude {lon} out of range");
        }
    }
    assert_eq!(parts[0].as_array().and_then(|p| p.last()).map(|p| &p[0]), Some(&serde_json::json!(180.0)));
    assert_eq!(parts[1][0][0], -180.0);
}
