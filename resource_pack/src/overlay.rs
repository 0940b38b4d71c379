//! Selection of the overlays active for a pack format.

use tracing::debug;

use crate::container::{Overlay, ResourceContainer};

/// Overlays the `overlays` metadata section enables for the given pack
/// format, in declaration order. A directory listed more than once counts at
/// its first position, declared directories without an overlay are skipped.
pub fn active_overlays(container: &ResourceContainer, version: u32) -> Vec<&Overlay> {
    let Some(overlays) = container.metadata().overlays() else {
        return vec![];
    };
    let mut directories: Vec<&str> = vec![];
    for entry in overlays.entries.iter() {
        if entry.formats.contains(version) && !directories.contains(&entry.directory.as_str()) {
            directories.push(&entry.directory);
        }
    }
    directories
        .into_iter()
        .filter_map(|directory| {
            let overlay = container.overlay(directory);
            if overlay.is_none() {
                debug!("Overlay {directory} is declared but missing");
            }
            overlay
        })
        .collect()
}

/// Resources as the game sees them for the given pack format: the base
/// resources with every active overlay applied in order, so later overlays
/// win. Icon and metadata are the base's, overlays are not carried over.
pub fn effective(container: &ResourceContainer, version: u32) -> ResourceContainer {
    let mut effective = ResourceContainer::new();
    effective.set_icon(container.icon().cloned());
    effective.set_metadata(container.metadata().clone());
    effective.merge(container);
    for overlay in active_overlays(container, version) {
        effective.merge(overlay.container());
    }
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        format::FormatRange,
        key::Key,
        metadata::{Metadata, OverlayEntry, OverlaysMeta, PackMeta},
        resource::Sound,
    };

    fn container(
        entries: Vec<OverlayEntry>,
        overlays: &[(&str, &'static [u8])],
    ) -> ResourceContainer {
        let key = Key::new("ns", "a").unwrap();
        let mut container = ResourceContainer::new();
        let mut metadata = Metadata::new();
        metadata.insert(PackMeta::new(13, "test"));
        metadata.insert(OverlaysMeta::new(entries));
        container.set_metadata(metadata);
        container.insert_sound(key.clone(), Sound::new(&b"base"[..]));
        for (directory, content) in overlays {
            let mut overlay = ResourceContainer::new();
            overlay.insert_sound(key.clone(), Sound::new(*content));
            container.insert_overlay(Overlay::new(*directory, overlay).unwrap());
        }
        container
    }

    fn sound(container: &ResourceContainer) -> &[u8] {
        &container.sound(&Key::new("ns", "a").unwrap()).unwrap().data
    }

    #[test]
    fn later_overlay_wins() {
        let container = container(
            vec![
                OverlayEntry::new(FormatRange::inclusive(10, 13), "a"),
                OverlayEntry::new(FormatRange::inclusive(12, 15), "b"),
            ],
            &[("a", b"a"), ("b", b"b")],
        );
        assert_eq!(sound(&effective(&container, 9)), b"base");
        assert_eq!(sound(&effective(&container, 11)), b"a");
        assert_eq!(sound(&effective(&container, 13)), b"b");
        assert_eq!(sound(&effective(&container, 15)), b"b");
        assert_eq!(sound(&effective(&container, 16)), b"base");
    }

    #[test]
    fn duplicates_keep_first_position() {
        let container = container(
            vec![
                OverlayEntry::new(FormatRange::exact(13), "a"),
                OverlayEntry::new(FormatRange::exact(13), "b"),
                OverlayEntry::new(FormatRange::exact(13), "a"),
            ],
            &[("a", b"a"), ("b", b"b")],
        );
        let directories: Vec<_> = active_overlays(&container, 13)
            .into_iter()
            .map(Overlay::directory)
            .collect();
        assert_eq!(directories, vec!["a", "b"]);
        assert_eq!(sound(&effective(&container, 13)), b"b");
    }

    #[test]
    fn missing_overlays_and_sections_are_skipped() {
        let container = container(
            vec![OverlayEntry::new(FormatRange::exact(13), "missing")],
            &[],
        );
        assert!(active_overlays(&container, 13).is_empty());
        assert_eq!(sound(&effective(&container, 13)), b"base");

        let mut container = container;
        container.metadata_mut().remove("overlays");
        assert!(active_overlays(&container, 13).is_empty());
    }

    #[test]
    fn effective_drops_overlays() {
        let container = container(
            vec![OverlayEntry::new(FormatRange::exact(13), "a")],
            &[("a", b"a")],
        );
        let effective = effective(&container, 13);
        assert_eq!(effective.overlays().count(), 0);
        assert_eq!(effective.metadata(), container.metadata());
    }
}
