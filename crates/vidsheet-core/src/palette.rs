//! Palette registry for style deduplication

use ahash::AHashMap;

use crate::color::ColorKey;

/// Run-lifetime deduplicating map from a color key to its cell style.
///
/// Sampled frames repeat colors constantly, both within a sheet and
/// across sheets. The registry guarantees each distinct color is
/// registered at most once for the whole run: resolving a key that has
/// been seen before returns the handle created the first time.
///
/// The registry never evicts; it grows with the number of distinct
/// colors observed, which the format's style ceiling caps in practice.
/// It is an explicit value owned by the pipeline, so independent runs
/// (and tests) never share palette state.
#[derive(Debug)]
pub struct PaletteRegistry<H> {
    styles: AHashMap<ColorKey, H>,
}

impl<H: Copy> PaletteRegistry<H> {
    pub fn new() -> Self {
        PaletteRegistry {
            styles: AHashMap::with_capacity(256),
        }
    }

    /// Resolve a color key to its style handle.
    ///
    /// `create` is invoked at most once per distinct key per registry;
    /// later resolutions of the same key return the stored handle
    /// without allocating a new style.
    pub fn resolve(&mut self, key: ColorKey, create: impl FnOnce() -> H) -> H {
        *self.styles.entry(key).or_insert_with(create)
    }

    /// Handle for a key that has already been resolved, if any.
    pub fn get(&self, key: ColorKey) -> Option<H> {
        self.styles.get(&key).copied()
    }

    /// Number of distinct color keys ever resolved.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl<H: Copy> Default for PaletteRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn key(r: u8, g: u8, b: u8) -> ColorKey {
        ColorKey::from(Rgb::new(r, g, b))
    }

    #[test]
    fn test_create_runs_once_per_key() {
        let mut registry: PaletteRegistry<u32> = PaletteRegistry::new();
        let mut created = 0;

        for _ in 0..5 {
            registry.resolve(key(10, 20, 30), || {
                created += 1;
                7
            });
        }

        assert_eq!(created, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_idempotent_resolution() {
        let mut registry: PaletteRegistry<u32> = PaletteRegistry::new();

        let first = registry.resolve(key(1, 2, 3), || 42);
        let second = registry.resolve(key(1, 2, 3), || 99);

        assert_eq!(first, 42);
        assert_eq!(second, 42); // the first handle, not a new one
    }

    #[test]
    fn test_distinct_keys_distinct_styles() {
        let mut registry: PaletteRegistry<u32> = PaletteRegistry::new();
        let mut next = 0;
        let mut make = || {
            let id = next;
            next += 1;
            id
        };

        let a = registry.resolve(key(0, 0, 0), &mut make);
        let b = registry.resolve(key(255, 255, 255), &mut make);
        let a_again = registry.resolve(key(0, 0, 0), &mut make);

        assert_ne!(a, b);
        assert_eq!(a, a_again);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registries_are_independent() {
        let mut first: PaletteRegistry<u32> = PaletteRegistry::new();
        first.resolve(key(9, 9, 9), || 1);

        let second: PaletteRegistry<u32> = PaletteRegistry::new();
        assert!(second.is_empty());
        assert_eq!(second.get(key(9, 9, 9)), None);
    }
}
