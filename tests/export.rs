use chrono::NaiveDate;
use pointmap::data::points::PointStore;
use pointmap::{export_filename_for, write_points_csv, PointMapConfig, SurfaceGeometry};

fn identity_geometry() -> SurfaceGeometry {
    SurfaceGeometry {
        display_width: 800.0,
        display_height: 600.0,
        original_width: 800.0,
        original_height: 600.0,
    }
}

fn csv_lines(
    store: &PointStore,
    cfg: &PointMapConfig,
    geometry: &SurfaceGeometry,
) -> Vec<String> {
    let mut buf = Vec::new();
    write_points_csv(&mut buf, store.points(), cfg, geometry).unwrap();
    String::from_utf8(buf)
        .unwrap()
        .trim_end()
        .split('\n')
        .map(str::to_string)
        .collect()
}

#[test]
fn writes_all_columns_by_default() {
    let mut store = PointStore::default();
    store.add_point(Some("LOC"), "1", 10.0, 20.0).unwrap();
    store.add_point(None, "7", 30.0, 40.0).unwrap();
    let lines = csv_lines(&store, &PointMapConfig::default(), &identity_geometry());
    assert_eq!(lines[0], "point_id,x,y,point_type,original_x,original_y");
    assert_eq!(lines[1], "LOC-1,10,20,LOC,10,20");
    // Unprefixed points report the placeholder type.
    assert_eq!(lines[2], "7,30,40,POINT,30,40");
}

#[test]
fn optional_columns_can_be_disabled() {
    let mut store = PointStore::default();
    store.add_point(Some("LOC"), "1", 10.0, 20.0).unwrap();
    let cfg = PointMapConfig {
        include_point_type: false,
        include_original_coords: false,
        ..PointMapConfig::default()
    };
    let lines = csv_lines(&store, &cfg, &identity_geometry());
    assert_eq!(lines[0], "point_id,x,y");
    assert_eq!(lines[1], "LOC-1,10,20");
}

#[test]
fn respects_the_configured_delimiter() {
    let mut store = PointStore::default();
    store.add_point(Some("LOC"), "1", 10.0, 20.0).unwrap();
    let cfg = PointMapConfig {
        csv_delimiter: ';',
        include_original_coords: false,
        ..PointMapConfig::default()
    };
    let lines = csv_lines(&store, &cfg, &identity_geometry());
    assert_eq!(lines[0], "point_id;x;y;point_type");
    assert_eq!(lines[1], "LOC-1;10;20;LOC");
}

#[test]
fn maps_display_coordinates_back_to_the_original_image() {
    let geometry = SurfaceGeometry {
        display_width: 400.0,
        display_height: 300.0,
        original_width: 800.0,
        original_height: 600.0,
    };
    assert_eq!(geometry.to_original(10.0, 20.0), (20, 40));
    // Rounding is per axis.
    let odd = SurfaceGeometry {
        display_width: 300.0,
        display_height: 300.0,
        original_width: 1000.0,
        original_height: 1000.0,
    };
    assert_eq!(odd.to_original(100.0, 50.0), (333, 167));

    let mut store = PointStore::default();
    store.add_point(Some("LOC"), "1", 10.0, 20.0).unwrap();
    let lines = csv_lines(&store, &PointMapConfig::default(), &geometry);
    assert_eq!(lines[1], "LOC-1,10,20,LOC,20,40");
}

#[test]
fn header_only_for_an_empty_point_set() {
    let store = PointStore::default();
    let lines = csv_lines(&store, &PointMapConfig::default(), &identity_geometry());
    assert_eq!(lines.len(), 1);
}

#[test]
fn filename_embeds_the_iso_date() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(export_filename_for(date), "image_points_2024-03-05.csv");
}
