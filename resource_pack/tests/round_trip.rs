use bytes::Bytes;

use iokum_resource_pack::{
    codec::Registry,
    metadata::{OverlayEntry, OverlaysMeta, PackMeta},
    overlay,
    resource::{BlockState, Font, JsonResource, Model, UnknownFile},
    serialize,
    tree::{MemoryTree, TreeWriter},
    Compression, Error, Key, Options, ResourceContainer,
};

const FILES: &[(&str, &str)] = &[
    (
        "pack.mcmeta",
        r#"{"pack":{"pack_format":34,"description":{"text":"Test","color":"gold"}},"overlays":{"entries":[{"formats":[18,33],"directory":"legacy"},{"formats":40,"directory":"future"}]},"custom":{"kept":true}}"#,
    ),
    ("pack.png", "\u{89}PNG"),
    ("credits.txt", "made by hand"),
    (
        "assets/minecraft/models/block/stone.json",
        r##"{"parent":"minecraft:block/cube_all","textures":{"all":"#side","side":"minecraft:block/stone"}}"##,
    ),
    (
        "assets/minecraft/blockstates/stone.json",
        r#"{"variants":{"":[{"model":"minecraft:block/stone"},{"model":"minecraft:block/stone_mirrored","y":180}]}}"#,
    ),
    (
        "assets/minecraft/font/default.json",
        r#"{"providers":[{"type":"space","advances":{" ":4}},{"type":"bitmap","file":"minecraft:font/ascii.png","ascent":7,"chars":["ab"]}]}"#,
    ),
    ("assets/minecraft/textures/block/stone.png", "png"),
    (
        "assets/minecraft/textures/block/stone.png.mcmeta",
        r#"{"animation":{"frametime":2}}"#,
    ),
    (
        "assets/minecraft/sounds.json",
        r#"{"block.stone.break":{"subtitle":"subtitles.block.generic.break","sounds":["minecraft:dig/stone1",{"name":"minecraft:dig/stone2","volume":0.5}]}}"#,
    ),
    ("assets/minecraft/sounds/dig/stone1.ogg", "ogg"),
    ("assets/minecraft/lang/en_us.json", r#"{"block.minecraft.stone":"Stone"}"#),
    ("assets/minecraft/shaders/core/a.fsh", "void main() {}"),
    (
        "legacy/assets/minecraft/lang/en_us.json",
        r#"{"block.minecraft.stone":"Old Stone"}"#,
    ),
];

fn tree() -> MemoryTree {
    FILES
        .iter()
        .map(|(path, content)| (path.to_string(), Bytes::from_static(content.as_bytes())))
        .collect()
}

fn written(container: &ResourceContainer, version: u32) -> MemoryTree {
    let mut tree = MemoryTree::new();
    serialize::write(&Registry::default(), container, version, &mut tree).unwrap();
    tree
}

fn key(value: &str) -> Key {
    Key::minecraft(value).unwrap()
}

#[test]
fn known_files_are_typed() {
    let container = serialize::read(&Registry::default(), tree().entries()).unwrap();
    assert_eq!(container.icon().map(|icon| &icon[..]), Some("\u{89}PNG".as_bytes()));
    assert_eq!(container.metadata().pack().unwrap().format, 34);
    assert_eq!(container.models().len(), 1);
    assert_eq!(container.block_states().len(), 1);
    assert_eq!(container.fonts().len(), 1);
    assert_eq!(container.sounds().len(), 1);
    assert_eq!(container.sound_registries().len(), 1);
    assert_eq!(container.languages().len(), 1);
    assert_eq!(container.unknown_files().len(), 2);
    assert!(container
        .texture(&key("block/stone.png"))
        .unwrap()
        .meta
        .as_ref()
        .and_then(|meta| meta.animation())
        .is_some());

    let legacy = container.overlay("legacy").unwrap().container();
    assert_eq!(
        legacy.language(&key("en_us")).unwrap().get("block.minecraft.stone"),
        Some("Old Stone")
    );
    assert!(container.overlay("future").is_none());
}

#[test]
fn read_write_is_lossless() {
    let tree = tree();
    let container = serialize::read(&Registry::default(), tree.entries()).unwrap();
    let written = written(&container, 34);
    assert_eq!(written, tree);
}

#[test]
fn writing_is_idempotent() {
    let registry = Registry::default();
    let container = serialize::read(&registry, tree().entries()).unwrap();
    let first = serialize::write_zip(&registry, &container, 34, vec![]).unwrap();
    let read = serialize::read_zip(&registry, first.as_slice()).unwrap();
    assert_eq!(read, container);
    let second = serialize::write_zip(&registry, &read, 34, vec![]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn stored_archives_round_trip() {
    let registry = Registry::new(Options {
        compression: Compression::Stored,
        ..Default::default()
    });
    let container = serialize::read(&registry, tree().entries()).unwrap();
    let archive = serialize::write_zip(&registry, &container, 34, vec![]).unwrap();
    assert_eq!(serialize::read_zip(&registry, archive.as_slice()).unwrap(), container);
}

#[test]
fn directory_round_trip() {
    let registry = Registry::default();
    let container = serialize::read(&registry, tree().entries()).unwrap();
    let directory = tempfile::tempdir().unwrap();
    serialize::write_directory(&registry, &container, 34, directory.path()).unwrap();
    assert_eq!(
        serialize::read_directory(&registry, directory.path()).unwrap(),
        container
    );
}

#[test]
fn truncated_archive_is_corrupt() {
    let registry = Registry::default();
    let container = serialize::read(&registry, tree().entries()).unwrap();
    let archive = serialize::write_zip(&registry, &container, 34, vec![]).unwrap();
    for length in [0, 3, 40] {
        assert!(matches!(
            serialize::read_zip(&registry, &archive[..length]),
            Err(Error::CorruptArchive(_))
        ));
    }
}

#[test]
fn malformed_json_policy() {
    let mut tree = tree();
    tree.write("assets/minecraft/models/broken.json", b"{\"parent\":")
        .unwrap();

    let container = serialize::read(&Registry::default(), tree.entries()).unwrap();
    assert_eq!(
        container
            .unknown_file(&"assets/minecraft/models/broken.json".to_owned())
            .map(|file| &file.data[..]),
        Some(&b"{\"parent\":"[..])
    );

    let strict = Registry::new(Options {
        strict: true,
        ..Default::default()
    });
    assert!(matches!(
        serialize::read(&strict, tree.entries()),
        Err(Error::MalformedResource { path, .. }) if path == "assets/minecraft/models/broken.json"
    ));
}

#[test]
fn overlays_resolve_for_version() {
    let container = serialize::read(&Registry::default(), tree().entries()).unwrap();

    let old = overlay::effective(&container, 20);
    assert_eq!(
        old.language(&key("en_us")).unwrap().get("block.minecraft.stone"),
        Some("Old Stone")
    );
    assert_eq!(old.overlays().count(), 0);

    let current = overlay::effective(&container, 34);
    assert_eq!(
        current.language(&key("en_us")).unwrap().get("block.minecraft.stone"),
        Some("Stone")
    );
}

#[test]
fn version_gated_output() {
    let mut container = ResourceContainer::new();
    let mut pack = PackMeta::new(15, "x");
    pack.supported_formats = Some(iokum_resource_pack::format::FormatRange::inclusive(15, 18));
    container.metadata_mut().insert(pack);
    container.insert_font(
        key("default"),
        Font::decode(
            br#"{"providers":[{"type":"unihex","hex_file":"minecraft:font/unifont.zip","size_overrides":[]}]}"#,
        )
        .unwrap(),
    );

    let tree = written(&container, 9);
    assert_eq!(
        &tree.get("pack.mcmeta").unwrap()[..],
        br#"{"pack":{"pack_format":15,"description":"x"}}"#
    );
    assert_eq!(
        &tree.get("assets/minecraft/font/default.json").unwrap()[..],
        br#"{"providers":[]}"#
    );
}

#[test]
fn built_pack_is_reproducible() {
    let mut container = ResourceContainer::new();
    container.metadata_mut().insert(PackMeta::new(34, "x"));
    container
        .metadata_mut()
        .insert(OverlaysMeta::new(vec![OverlayEntry::new(
            iokum_resource_pack::format::FormatRange::exact(34),
            "overlay_34",
        )]));
    container.insert_model(key("block/a"), Model::default());
    container.insert_block_state(key("a"), BlockState::default());
    container.insert_unknown_file("README".to_owned(), UnknownFile::new(&b"hi"[..]));

    let registry = Registry::default();
    let first = serialize::build(&registry, &container, 34).unwrap();
    let second = serialize::build(&registry, &container.clone(), 34).unwrap();
    assert_eq!(first.sha1, second.sha1);
    assert_eq!(first.bytes, second.bytes);
    assert!(first.sha1.chars().all(|char| char.is_ascii_hexdigit() && !char.is_ascii_uppercase()));
}
