//! End-to-end: settings → parallel generation → erosion → mesh sink.

use strata_mesh::{BufferRegistry, TerrainVertex};
use strata_terrain::{
    ErosionSettings, SettingsChange, TerrainError, TerrainPreset, World, WorldSettings,
};

fn eroded_islands() -> WorldSettings {
    WorldSettings {
        chunks_x: 3,
        chunks_z: 2,
        tile_width: 33,
        tile_height: 33,
        blend: true,
        erosion_iterations: 400,
        erosion: ErosionSettings::enabled(),
        ..WorldSettings::from_preset(TerrainPreset::Islands)
    }
}

#[test]
fn test_world_uploads_every_tile_mesh() {
    let mut world = World::with_threads(eroded_islands(), 3).unwrap();
    let mut sink = BufferRegistry::new();
    world.upload(&mut sink).unwrap();

    assert_eq!(sink.len(), 6);
    for chunk in world.chunks() {
        let uploaded = sink.get(chunk.handle().unwrap()).unwrap();
        let vertices: &[TerrainVertex] = bytemuck::cast_slice(&uploaded.vertex_bytes);
        let indices: &[u32] = bytemuck::cast_slice(&uploaded.index_bytes);
        assert_eq!(vertices.len(), 33 * 33);
        assert_eq!(indices.len(), 32 * 32 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        assert!(
            vertices.iter().all(|v| v.height() >= 0.0),
            "Blended, eroded heights stay non-negative"
        );
    }
}

#[test]
fn test_erosion_tweak_refreshes_in_place() {
    let mut world = World::with_threads(eroded_islands(), 2).unwrap();
    let mut sink = BufferRegistry::new();
    world.upload(&mut sink).unwrap();
    let handles: Vec<_> = world.chunks().iter().map(|c| c.handle()).collect();

    let mut tweaked = eroded_islands();
    tweaked.erosion.erode_speed = 0.6;
    tweaked.erosion_iterations = 800;
    assert_eq!(world.apply(tweaked, &mut sink).unwrap(), SettingsChange::HeightsOnly);

    let after: Vec<_> = world.chunks().iter().map(|c| c.handle()).collect();
    assert_eq!(handles, after, "Height-only changes keep buffer identity");
    assert!(world
        .chunks()
        .iter()
        .all(|c| sink.get(c.handle().unwrap()).unwrap().revision == 2));
}

#[test]
fn test_resize_then_refresh() {
    let mut world = World::with_threads(eroded_islands(), 2).unwrap();
    let mut sink = BufferRegistry::new();
    world.upload(&mut sink).unwrap();

    let resized = WorldSettings {
        lod: 2,
        ..eroded_islands()
    };
    assert_eq!(world.apply(resized, &mut sink).unwrap(), SettingsChange::Full);
    assert_eq!(sink.len(), 6);
    assert_eq!(world.chunks()[0].height_map().width(), 65);

    assert!(matches!(
        world.refresh_tile(9, 9, false, &mut sink),
        Err(TerrainError::TileNotFound { .. })
    ));
}
