use geo_poi_scene::core::LatLngAlt;
use geo_poi_scene::{
    GeoSceneManager, LatLng, PoiSpec, SceneCommand, SceneController, SceneOptions, SceneState,
    Selectable,
};

fn ready_scene(controller: &mut SceneController) -> GeoSceneManager {
    let mut scene = GeoSceneManager::new(SceneOptions::default());
    controller
        .handle_commands(
            &mut scene,
            [
                SceneCommand::SetOrigin {
                    origin: LatLng::new(48.8566, 2.3522),
                },
                SceneCommand::Init,
            ],
        )
        .expect("Init sollte ohne Fehler durchlaufen");
    scene
}

fn spec(sid: &str, alt: f64) -> PoiSpec {
    PoiSpec::new(sid, LatLngAlt::new(48.8566, 2.3522, alt))
}

#[test]
fn test_add_poi_logs_command_and_registers_poi() {
    let mut controller = SceneController::new();
    let mut scene = ready_scene(&mut controller);

    controller
        .handle_command(
            &mut scene,
            SceneCommand::AddPoi {
                spec: spec("louvre", 0.0),
            },
        )
        .expect("AddPoi sollte ohne Fehler durchlaufen");

    assert!(scene.has_poi("louvre"));
    let last = controller
        .command_log()
        .entries()
        .last()
        .expect("Es sollte ein Command geloggt sein");
    assert!(last.starts_with("AddPoi"), "Unerwarteter Eintrag: {last}");
}

#[test]
fn test_duplicate_add_fails_without_state_change() {
    let mut controller = SceneController::new();
    let mut scene = ready_scene(&mut controller);
    controller
        .handle_command(&mut scene, SceneCommand::AddPoi { spec: spec("a", 0.0) })
        .expect("erstes AddPoi sollte gelingen");

    let result = controller.handle_command(
        &mut scene,
        SceneCommand::AddPoi {
            spec: spec("a", 250.0),
        },
    );

    assert!(result.is_err());
    assert_eq!(scene.pois().len(), 1);
    assert_eq!(scene.get_poi("a").map(|p| p.alt()), Some(0.0));
}

#[test]
fn test_remove_unknown_poi_is_an_error() {
    let mut controller = SceneController::new();
    let mut scene = ready_scene(&mut controller);

    let result = controller.handle_command(
        &mut scene,
        SceneCommand::RemovePoi {
            sid: "missing".into(),
        },
    );

    assert!(result.is_err());
    // auch fehlgeschlagene Commands werden geloggt
    assert_eq!(controller.command_log().len(), 3);
}

#[test]
fn test_pick_then_clear_selection() {
    let mut controller = SceneController::new();
    let mut scene = ready_scene(&mut controller);

    controller
        .handle_commands(
            &mut scene,
            [
                SceneCommand::AddPoi {
                    spec: spec("center", 0.0),
                },
                SceneCommand::Pick {
                    screen_x: 400,
                    screen_y: 300,
                },
            ],
        )
        .expect("Pick sollte ohne Fehler durchlaufen");
    assert_eq!(scene.selected_sid(), Some("center"));

    controller
        .handle_command(&mut scene, SceneCommand::ClearSelection)
        .expect("ClearSelection sollte ohne Fehler durchlaufen");

    assert!(scene.selected_sid().is_none());
    assert!(scene.get_poi("center").is_some_and(|p| !p.is_selected()));
}

#[test]
fn test_fly_camera_uses_option_defaults() {
    let mut controller = SceneController::new();
    let mut scene = ready_scene(&mut controller);
    let target = LatLngAlt::new(48.8584, 2.2945, 400.0);

    controller
        .handle_command(
            &mut scene,
            SceneCommand::FlyCamera {
                coords: target,
                duration: None,
                easing: None,
            },
        )
        .expect("FlyCamera sollte ohne Fehler durchlaufen");

    let duration = scene
        .camera_controller()
        .animation()
        .map(|anim| anim.duration());
    assert_eq!(duration, Some(SceneOptions::default().camera_flight_duration));

    for _ in 0..150 {
        controller
            .handle_command(&mut scene, SceneCommand::Step { dt: 1.0 / 60.0 })
            .expect("Step sollte ohne Fehler durchlaufen");
    }
    assert_eq!(scene.camera().coords, target);
}

#[test]
fn test_invalid_camera_target_is_rejected() {
    let mut controller = SceneController::new();
    let mut scene = ready_scene(&mut controller);
    let before = scene.camera().coords;

    let result = controller.handle_command(
        &mut scene,
        SceneCommand::PlaceCamera {
            coords: LatLngAlt::new(95.0, 0.0, 100.0),
        },
    );

    assert!(result.is_err());
    assert_eq!(scene.camera().coords, before);
}

#[test]
fn test_unload_then_init_cycle() {
    let mut controller = SceneController::new();
    let mut scene = ready_scene(&mut controller);

    controller
        .handle_commands(
            &mut scene,
            [
                SceneCommand::AddPoi {
                    spec: spec("a", 0.0),
                },
                SceneCommand::Unload,
            ],
        )
        .expect("Unload sollte ohne Fehler durchlaufen");
    assert_eq!(scene.state(), SceneState::Unloaded);
    assert!(!scene.has_poi("a"));

    controller
        .handle_commands(
            &mut scene,
            [
                SceneCommand::SetOrigin {
                    origin: LatLng::new(52.52, 13.405),
                },
                SceneCommand::Init,
            ],
        )
        .expect("erneutes Init sollte ohne Fehler durchlaufen");
    assert!(scene.is_ready());
    assert!(!scene.tiles().is_empty());
}
