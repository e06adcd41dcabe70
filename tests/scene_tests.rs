// Host-side tests for scene composition, palette, beacon and ambient fields.

use lumina_core::*;
use rand::{rngs::StdRng, SeedableRng};

fn signal(openness: f32) -> ControlSignal {
    ControlSignal {
        is_open: openness > 0.5,
        openness,
        rotation_x: 0.0,
        rotation_y: 0.0,
        is_detected: true,
    }
}

#[test]
fn default_scene_splits_the_particle_budget() {
    let config = SceneConfig::default();
    assert_eq!(config.ribbon_count(), 1080);
    assert_eq!(config.count_per_category(), 1980);

    let scene = Scene::new(config.clone(), 11);
    assert_eq!(scene.layers.len(), LayerKind::ALL.len());
    for category in ShapeCategory::ALL {
        let l = scene.layer(LayerKind::Tree(category)).unwrap();
        assert_eq!(l.len(), config.count_per_category());
        assert_eq!(l.mode(), ShapeMode::Volumetric);
    }
    let ribbon = scene.layer(LayerKind::Ribbon).unwrap();
    assert_eq!(ribbon.mode(), ShapeMode::Ribbon);
    assert_eq!(ribbon.len(), config.ribbon_count());
    assert_eq!(scene.particle_count(), 9000);
    assert_eq!(scene.starfield.positions().len(), STARFIELD_COUNT);
    assert_eq!(scene.snowfall.positions().len(), SNOWFALL_COUNT);
}

#[test]
fn layers_get_their_own_styles() {
    let scene = Scene::new(SceneConfig::default(), 1);
    let star = scene.layer(LayerKind::Tree(ShapeCategory::Star)).unwrap();
    let snow = scene.layer(LayerKind::Tree(ShapeCategory::Snow)).unwrap();
    let ribbon = scene.layer(LayerKind::Ribbon).unwrap();
    assert_eq!(star.style().size, TREE_POINT_SIZE);
    assert!((snow.style().size - TREE_POINT_SIZE * SNOW_SIZE_MULTIPLIER).abs() < 1e-6);
    assert_eq!(ribbon.style().size, RIBBON_POINT_SIZE);
    assert_eq!(ribbon.params().idle_spin, RIBBON_IDLE_SPIN);
    // each category drifts out of phase with the others
    assert_ne!(star.params().drift_phase, snow.params().drift_phase);
}

#[test]
fn seeded_scenes_are_reproducible() {
    let a = Scene::new(SceneConfig::default(), 99);
    let b = Scene::new(SceneConfig::default(), 99);
    for (la, lb) in a.layers.iter().zip(&b.layers) {
        assert_eq!(la.layer.rest(), lb.layer.rest());
        assert_eq!(la.layer.scatter(), lb.layer.scatter());
    }
    let star = LayerKind::Tree(ShapeCategory::Star);
    let heart = LayerKind::Tree(ShapeCategory::Heart);
    assert_ne!(a.layer(star).unwrap().rest(), a.layer(heart).unwrap().rest());
}

#[test]
fn ribbon_share_can_be_zero_or_total() {
    let config = SceneConfig {
        particle_count: 100,
        ribbon_fraction: 0.0,
        ..SceneConfig::default()
    };
    let scene = Scene::new(config, 0);
    assert!(scene.layer(LayerKind::Ribbon).unwrap().is_empty());
    assert_eq!(scene.particle_count(), 100);

    let config = SceneConfig {
        particle_count: 100,
        ribbon_fraction: 1.0,
        ..SceneConfig::default()
    };
    let scene = Scene::new(config, 0);
    assert_eq!(scene.layer(LayerKind::Ribbon).unwrap().len(), 100);
    assert!(scene.layer(LayerKind::Tree(ShapeCategory::Orb)).unwrap().is_empty());
}

#[test]
fn advance_reads_the_cell_once() {
    let mut scene = Scene::new(SceneConfig::default(), 5);
    let cell = SignalCell::new();
    cell.apply(&Observation::FALLBACK, 1.0);
    let s = scene.advance(FrameTime::new(1.0, 0.016), &cell);
    assert_eq!(s, cell.snapshot());
    assert!(!s.is_detected);
}

#[test]
fn create_layer_is_detached() {
    let mut scene = Scene::new(SceneConfig::default(), 5);
    let before = scene.particle_count();
    let extra = scene.create_layer(ShapeMode::Ribbon, 50);
    assert_eq!(extra.len(), 50);
    assert_eq!(extra.style().size, RIBBON_POINT_SIZE);
    assert_eq!(scene.particle_count(), before);
    assert!(scene.create_layer(ShapeMode::Volumetric, 0).is_empty());
}

#[test]
fn beacon_sits_above_the_tree_group() {
    let scene = Scene::new(SceneConfig::default(), 5);
    let p = scene.beacon_world_position();
    let expected = TREE_OFFSET.y + BEACON_HEIGHT * TREE_SCALE;
    assert!((p.y - expected).abs() < 1e-4);
}

#[test]
fn palette_covers_every_kind() {
    let palette = Palette::default();
    for kind in LayerKind::ALL {
        let [r, g, b] = palette.color(kind).to_array();
        assert!([r, g, b].iter().all(|c| (0.0..=1.0).contains(c)));
    }
    assert_eq!(
        palette.color(LayerKind::Tree(ShapeCategory::Snow)),
        Rgb::from_hex(DIAMOND).unwrap()
    );
}

#[test]
fn palette_rejects_missing_kinds() {
    let white = Rgb([1.0, 1.0, 1.0]);
    let partial: Vec<_> = LayerKind::ALL[..4].iter().map(|k| (*k, white)).collect();
    assert_eq!(
        Palette::from_entries(&partial),
        Err(SceneError::MissingColor(LayerKind::Ribbon))
    );

    let mut full: Vec<_> = LayerKind::ALL.iter().map(|k| (*k, white)).collect();
    full.push((LayerKind::Ribbon, Rgb([0.0, 0.0, 0.0])));
    let palette = Palette::from_entries(&full).unwrap();
    assert_eq!(palette.color(LayerKind::Ribbon), Rgb([0.0, 0.0, 0.0]));
}

#[test]
fn palette_edits_one_kind() {
    let mut palette = Palette::default();
    let rose = Rgb::from_hex(ROSE).unwrap();
    palette.set_color(LayerKind::Ribbon, rose);
    assert_eq!(palette.color(LayerKind::Ribbon), rose);
    assert_ne!(palette.color(LayerKind::Tree(ShapeCategory::Star)), rose);
}

#[test]
fn hex_colors_parse() {
    assert_eq!(Rgb::from_hex("#FF0000").unwrap(), Rgb([1.0, 0.0, 0.0]));
    assert_eq!(Rgb::from_hex("00ff00").unwrap(), Rgb([0.0, 1.0, 0.0]));
    for bad in ["#GG0000", "#FFF", "", "#FF00001", "#ÿÿÿ", "#+f+f+f", "+0+0+0", "# 0ff00"] {
        assert!(
            matches!(Rgb::from_hex(bad), Err(SceneError::InvalidColor(_))),
            "{bad:?} should be rejected"
        );
    }
    for hex in THEME {
        assert!(Rgb::from_hex(hex).is_ok());
    }
}

#[test]
fn beacon_power_tracks_openness() {
    assert!((Beacon::power(&signal(0.0), 0.0) - 0.9).abs() < 1e-6);
    assert!((Beacon::power(&signal(1.0), 0.0) - 1.5).abs() < 1e-6);
    for i in 0..100 {
        let p = Beacon::power(&ControlSignal::default(), i as f32 * 0.3);
        assert!((0.95 - 1e-6..=1.05 + 1e-6).contains(&p));
    }
}

#[test]
fn beacon_advance_scales_light_and_spins() {
    let mut beacon = Beacon::new();
    assert_eq!(beacon.clusters.len(), 3);
    for _ in 0..4 {
        beacon.advance(FrameTime::new(9.0, 0.5), &signal(1.0));
    }
    assert!((beacon.light_intensity - BEACON_LIGHT_INTENSITY * 1.5).abs() < 1e-5);
    assert!((beacon.transform.scale - 1.5).abs() < 1e-6);
    let core = beacon.cluster_transform(0).unwrap();
    assert!((core.rotation.z - 2.0 * BEACON_CORE_SPIN).abs() < 1e-5);
    assert_eq!(beacon.cluster_transform(2).unwrap().rotation.z, 0.0);
    assert!(beacon.cluster_transform(3).is_none());
}

#[test]
fn paused_beacon_holds_still() {
    let mut beacon = Beacon::new();
    beacon.advance(FrameTime::new(1.0, 1.0), &signal(0.4));
    let pose = beacon.transform;
    let angle = beacon.clusters[0].angle;
    let light = beacon.light_intensity;
    for t in [2.0, 5.0, 11.0] {
        beacon.advance(FrameTime::new(t, 0.0), &signal(1.0));
    }
    assert_eq!(beacon.transform, pose);
    assert_eq!(beacon.clusters[0].angle, angle);
    assert_eq!(beacon.light_intensity, light);
}

#[test]
fn beacon_light_reaches_its_clusters() {
    let mut beacon = Beacon::new();
    let (_, resting) = beacon.lit_cluster(1).unwrap();
    assert!((resting.opacity - beacon.clusters[1].style.opacity).abs() < 1e-6);

    beacon.light_color = Rgb([1.0, 0.5, 0.0]);
    beacon.advance(FrameTime::new(0.0, 0.016), &signal(1.0));
    let (color, lit) = beacon.lit_cluster(1).unwrap();
    let base = beacon.clusters[1].color.to_array();
    assert_eq!(color, Rgb([base[0], base[1] * 0.5, 0.0]));
    assert!((lit.opacity - beacon.clusters[1].style.opacity * 1.5).abs() < 1e-5);
    assert_eq!(lit.size, beacon.clusters[1].style.size);

    // brighter light never pushes opacity past 1
    let (_, core) = beacon.lit_cluster(0).unwrap();
    assert!(core.opacity <= 1.0);
    assert!(beacon.lit_cluster(3).is_none());
}

#[test]
fn each_category_has_its_own_sprite() {
    let sprites: Vec<_> = LayerKind::ALL.iter().map(|k| k.sprite()).collect();
    for (i, a) in sprites.iter().enumerate() {
        for b in &sprites[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert_eq!(LayerKind::Tree(ShapeCategory::Star).sprite(), Sprite::Star);
    assert_eq!(LayerKind::Tree(ShapeCategory::Snow).sprite(), Sprite::Snowflake);
    assert_eq!(LayerKind::Ribbon.sprite().index(), 0);
}

#[test]
fn starfield_lies_on_a_distant_shell() {
    let stars = Starfield::new(500, &mut StdRng::seed_from_u64(2));
    for p in stars.positions() {
        let r = p.length();
        assert!(r >= STARFIELD_MIN_RADIUS - 1e-3);
        assert!(r <= STARFIELD_MIN_RADIUS + STARFIELD_RADIUS_SPAN + 1e-3);
    }
}

#[test]
fn snowfall_wraps_inside_its_volume() {
    let mut snow = Snowfall::new(300, &mut StdRng::seed_from_u64(4));
    let mut t = 0.0;
    for _ in 0..2000 {
        t += 0.1;
        snow.advance(FrameTime::new(t, 0.1));
    }
    for p in snow.positions() {
        assert!(p.y >= -SNOWFALL_HALF_EXTENT && p.y <= SNOWFALL_HALF_EXTENT);
    }
}

#[test]
fn frame_time_sanitizes_delta() {
    assert_eq!(FrameTime::new(1.0, -0.5).step(), 0.0);
    assert_eq!(FrameTime::new(1.0, f32::NAN).step(), 0.0);
    assert_eq!(FrameTime::new(1.0, 0.25).step(), 0.25);

    let mut clock = FrameClock::new();
    clock.set_paused(true);
    assert!(clock.is_paused());
    std::thread::sleep(std::time::Duration::from_millis(5));
    let t = clock.tick();
    assert_eq!(t.delta, 0.0);
    assert!(t.elapsed > 0.0);
}
