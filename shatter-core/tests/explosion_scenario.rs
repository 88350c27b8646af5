//! # 爆炸场景集成测试
//!
//! 从三段式网格构建碎片集，再通过 explode() 驱动整个进度过程。

use shatter_core::glam::Vec3;
use shatter_core::{
    AnimationDriver, AnimationState, DriverSettings, FragmentSet, MeshHandle, SourceMesh,
    evaluate_camera, explosion,
};

const DT: f32 = 1.0 / 60.0;

/// Y = {-1, 0, 1} 的三块碎片，全部偏离中轴
fn three_piece() -> FragmentSet {
    FragmentSet::build([
        SourceMesh::new(MeshHandle(0), Vec3::new(1.0, -1.0, 0.0)),
        SourceMesh::new(MeshHandle(1), Vec3::new(0.0, 0.0, 1.0)),
        SourceMesh::new(MeshHandle(2), Vec3::new(-1.0, 1.0, 0.0)),
    ])
    .unwrap()
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

#[test]
fn test_three_piece_thresholds() {
    let set = three_piece();
    assert_eq!(set.min_y(), -1.0);
    assert_eq!(set.max_y(), 1.0);
    assert_eq!(set.interval(), 2.0);

    let pcts: Vec<f32> = set.iter().map(|f| f.pct).collect();
    assert_eq!(pcts, vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_explode_moves_bottom_first() {
    let set = three_piece();
    let rest: Vec<Vec3> = set.iter().map(|f| f.rest_position).collect();
    let mut driver = AnimationDriver::new(set, AnimationState::default(), DriverSettings::default());

    driver.explode();

    // 第一帧：底部碎片已经开始移动，中部和顶部静止
    let first = driver.tick(DT);
    assert!(first.state.progress > 0.0);
    assert!(horizontal_distance(first.explosion.positions[0], rest[0]) > 0.0);
    assert_eq!(first.explosion.positions[1], rest[1]);
    assert_eq!(first.explosion.positions[2], rest[2]);

    // 整个过渡过程中：位移单调不减，顶部碎片直到进度到 1 都不动
    let mut previous = first.explosion.positions.clone();
    let mut middle_started = false;
    for _ in 0..(7 * 60) {
        let frame = driver.tick(DT);
        for (index, position) in frame.explosion.positions.iter().enumerate() {
            let before = horizontal_distance(previous[index], rest[index]);
            let now = horizontal_distance(*position, rest[index]);
            assert!(now >= before);
        }
        if frame.state.progress > 0.51 {
            middle_started = true;
            assert!(horizontal_distance(frame.explosion.positions[1], rest[1]) > 0.0);
        }
        assert_eq!(frame.explosion.positions[2], rest[2]);
        previous = frame.explosion.positions;
    }

    assert!(middle_started);
    assert_eq!(driver.state().progress, 1.0);

    // 满进度、强度 15：底部位移 15，中部 7.5，顶部 0
    let end = driver.evaluate();
    assert!((horizontal_distance(end.explosion.positions[0], rest[0]) - 15.0).abs() < 1e-5);
    assert!((horizontal_distance(end.explosion.positions[1], rest[1]) - 7.5).abs() < 1e-5);
    assert_eq!(end.camera, evaluate_camera(1.0));
}

#[test]
fn test_collapse_returns_to_rest() {
    let set = three_piece();
    let rest: Vec<Vec3> = set.iter().map(|f| f.rest_position).collect();
    let mut driver = AnimationDriver::new(set, AnimationState::default(), DriverSettings::default());

    driver.explode();
    for _ in 0..60 {
        driver.tick(DT);
    }
    driver.collapse();
    for _ in 0..(7 * 60) {
        driver.tick(DT);
    }

    let frame = driver.evaluate();
    assert_eq!(frame.state.progress, 0.0);
    assert_eq!(frame.explosion.positions, rest);
    assert_eq!(frame.camera.position, Vec3::new(0.0, 0.0, 8.0));
}

#[test]
fn test_empty_set_still_drives_camera() {
    let mut driver = AnimationDriver::new(
        FragmentSet::empty(),
        AnimationState::default(),
        DriverSettings::default(),
    );
    driver.set_progress(1.0);
    let frame = driver.tick(DT);
    assert!(frame.explosion.positions.is_empty());
    assert_eq!(frame.camera.position, Vec3::new(0.0, 8.0, 0.0));
    assert_eq!(frame.explosion.rotation, explosion::rotation(1.0));
}
