//! Scene finding: turn per-character appearances into filtered scenes.
//!
//! The pipeline is
//!
//! 1. [`candidate_windows`] -- merge each required character's presence,
//!    intersect across required characters, then subtract every excluded
//!    character's presence.
//! 2. [`assemble`] -- resolve the full roster of each window and emit a
//!    [`Scene`] when every required character survives.
//! 3. [`number_scenes`] -- assign stable `segment_<n>_<start>_<end>` ids.
//!
//! [`find_scenes`] runs the whole pipeline with the optional confidence and
//! duration filters of a [`SceneQuery`].

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::appearance::{filter_by_confidence, Appearance};
use crate::error::CoreError;
use crate::interval::{hull, intersect_all, merge, subtract, Interval};
use crate::pagination::Page;
use crate::scene_query::SceneQuery;
use crate::timecode::format_hms;
use crate::types::{CharacterId, Seconds, VideoId};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One character's presence inside a scene, clipped to the scene window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneCharacter {
    pub character_id: CharacterId,
    pub name: String,
    pub avatar: Option<String>,
    /// Highest confidence among the appearances contributing to this scene.
    pub confidence: f64,
    pub start_time: Seconds,
    pub end_time: Seconds,
    pub start_frame: i32,
    pub end_frame: i32,
}

/// A time window satisfying a scene query, with everyone on screen in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub video_id: VideoId,
    pub scene_id: String,
    pub start_time: Seconds,
    pub end_time: Seconds,
    pub duration: Seconds,
    pub start_frame: i32,
    pub end_frame: i32,
    pub start_time_formatted: String,
    pub end_time_formatted: String,
    pub character_count: usize,
    pub characters: Vec<SceneCharacter>,
}

impl Scene {
    pub fn has_character(&self, id: &CharacterId) -> bool {
        self.characters.iter().any(|c| c.character_id == *id)
    }
}

pub type ScenePage = Page<Scene>;

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Find every scene of `video_id` matching `query`, in ascending start order.
///
/// `appearances` must already have passed
/// [`screen_appearances`](crate::appearance::screen_appearances). An empty
/// input yields an empty list, never an error.
pub fn find_scenes(
    video_id: VideoId,
    appearances: Vec<Appearance>,
    query: &SceneQuery,
) -> Result<Vec<Scene>, CoreError> {
    query.validate()?;

    let appearances = filter_by_confidence(appearances, query.min_confidence);
    let windows = candidate_windows(&appearances, query);
    let mut scenes = assemble(video_id, &windows, &appearances, &query.include, &query.exclude);

    scenes.retain(|s| query.accepts_duration(s.duration));
    number_scenes(&mut scenes);
    Ok(scenes)
}

/// Windows in which every required character is present and no excluded
/// character is.
///
/// With no required characters, every moment some non-excluded character is
/// on screen is a candidate.
pub fn candidate_windows(appearances: &[Appearance], query: &SceneQuery) -> Vec<Interval> {
    let by_character = intervals_by_character(appearances);
    let excluded: HashSet<_> = query.exclude.iter().collect();

    let base = if query.include.is_empty() {
        let present: Vec<Interval> = by_character
            .iter()
            .filter(|(id, _)| !excluded.contains(id))
            .flat_map(|(_, spans)| spans.iter().cloned())
            .collect();
        merge(&present)
    } else {
        let required: Vec<Vec<Interval>> = query
            .include
            .iter()
            .map(|id| by_character.get(id).map(|s| merge(s)).unwrap_or_default())
            .collect();
        merge(&intersect_all(&required))
    };

    let blocked: Vec<Interval> = query
        .exclude
        .iter()
        .filter_map(|id| by_character.get(id))
        .flat_map(|spans| spans.iter().cloned())
        .collect();

    subtract(&base, &merge(&blocked))
}

/// Build scenes from candidate `windows`.
///
/// For each window the roster is every character on screen during it, not
/// only the required ones. Excluded time is carved out of each character's
/// presence; a window loses its scene when a required character has nothing
/// left. With more than one required character the scene bounds shrink to
/// the time they all share. Scenes come back numbered in window order.
pub fn assemble(
    video_id: VideoId,
    windows: &[Interval],
    appearances: &[Appearance],
    include: &[CharacterId],
    exclude: &[CharacterId],
) -> Vec<Scene> {
    let excluded: HashSet<_> = exclude.iter().collect();

    let mut scenes: Vec<Scene> = windows
        .iter()
        .filter_map(|window| assemble_window(video_id, window, appearances, include, &excluded))
        .collect();
    number_scenes(&mut scenes);
    scenes
}

/// Assign `segment_<n>_<start>_<end>` ids, `n` counting from 1.
pub fn number_scenes(scenes: &mut [Scene]) {
    for (index, scene) in scenes.iter_mut().enumerate() {
        scene.scene_id = format!(
            "segment_{}_{:.3}_{:.3}",
            index + 1,
            scene.start_time,
            scene.end_time
        );
    }
}

// ---------------------------------------------------------------------------
// Window assembly
// ---------------------------------------------------------------------------

/// An appearance clipped to the window under assembly.
struct Clipped<'a> {
    appearance: &'a Appearance,
    span: Interval,
}

fn assemble_window(
    video_id: VideoId,
    window: &Interval,
    appearances: &[Appearance],
    include: &[CharacterId],
    excluded: &HashSet<&CharacterId>,
) -> Option<Scene> {
    let mut present: BTreeMap<CharacterId, Vec<Clipped<'_>>> = BTreeMap::new();
    let mut blocked = Vec::new();

    for appearance in appearances {
        let Some(span) = appearance.interval().clip(window) else {
            continue;
        };
        if excluded.contains(&appearance.character_id) {
            blocked.push(span);
        } else {
            present
                .entry(appearance.character_id)
                .or_default()
                .push(Clipped { appearance, span });
        }
    }

    let blocked = merge(&blocked);
    let remaining: BTreeMap<CharacterId, Vec<Interval>> = present
        .iter()
        .filter_map(|(id, clips)| {
            let spans: Vec<Interval> = clips.iter().map(|c| c.span.clone()).collect();
            let left = subtract(&spans, &blocked);
            (!left.is_empty()).then_some((*id, left))
        })
        .collect();

    if !include.iter().all(|id| remaining.contains_key(id)) {
        return None;
    }

    let bounds = if include.len() > 1 {
        let required: Vec<Vec<Interval>> = include
            .iter()
            .filter_map(|id| remaining.get(id).cloned())
            .collect();
        let shared = hull(&intersect_all(&required))?;
        Interval::new(shared.start, shared.end)
    } else {
        Interval::new(window.start, window.end)
    };

    let mut characters: Vec<SceneCharacter> = remaining
        .iter()
        .filter_map(|(id, spans)| scene_character(&present[id], spans, &bounds))
        .collect();

    if characters.is_empty() || !include.iter().all(|id| characters.iter().any(|c| c.character_id == *id)) {
        return None;
    }

    characters.sort_by(|a, b| {
        a.start_time
            .total_cmp(&b.start_time)
            .then_with(|| a.character_id.cmp(&b.character_id))
    });

    let start_frame = characters.iter().map(|c| c.start_frame).min().unwrap_or_default();
    let end_frame = characters.iter().map(|c| c.end_frame).max().unwrap_or_default();

    Some(Scene {
        video_id,
        scene_id: String::new(),
        start_time: bounds.start,
        end_time: bounds.end,
        duration: bounds.duration(),
        start_frame,
        end_frame,
        start_time_formatted: format_hms(bounds.start),
        end_time_formatted: format_hms(bounds.end),
        character_count: characters.len(),
        characters,
    })
}

/// Roster entry for one character, or `None` when nothing of its presence
/// falls inside `bounds`.
fn scene_character(clips: &[Clipped<'_>], spans: &[Interval], bounds: &Interval) -> Option<SceneCharacter> {
    let inside: Vec<Interval> = spans.iter().filter_map(|s| s.clip(bounds)).collect();
    let extent = hull(&inside)?;

    let contributing: Vec<&Clipped<'_>> = clips.iter().filter(|c| c.span.overlaps(&extent)).collect();
    let first = contributing.first()?.appearance;

    let confidence = contributing
        .iter()
        .map(|c| c.appearance.confidence)
        .fold(f64::NEG_INFINITY, f64::max);

    let frames = contributing.iter().flat_map(|c| {
        let a = c.appearance;
        [
            a.frame_at(a.start_time.max(extent.start)),
            a.frame_at(a.end_time.min(extent.end)),
        ]
    });
    let (start_frame, end_frame) = frames.fold((i32::MAX, i32::MIN), |(lo, hi), f| (lo.min(f), hi.max(f)));

    Some(SceneCharacter {
        character_id: first.character_id,
        name: first.character_name.clone(),
        avatar: first.character_avatar.clone(),
        confidence,
        start_time: extent.start,
        end_time: extent.end,
        start_frame,
        end_frame,
    })
}

fn intervals_by_character(appearances: &[Appearance]) -> BTreeMap<CharacterId, Vec<Interval>> {
    let mut grouped: BTreeMap<CharacterId, Vec<Interval>> = BTreeMap::new();
    for appearance in appearances {
        grouped
            .entry(appearance.character_id)
            .or_default()
            .push(appearance.interval());
    }
    grouped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    const FPS: f64 = 25.0;

    struct Fixture {
        video: VideoId,
        a: CharacterId,
        b: CharacterId,
        c: CharacterId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                video: Uuid::new_v4(),
                a: Uuid::new_v4(),
                b: Uuid::new_v4(),
                c: Uuid::new_v4(),
            }
        }

        fn appear(&self, character: CharacterId, start: f64, end: f64) -> Appearance {
            let name = if character == self.a {
                "Alice"
            } else if character == self.b {
                "Bob"
            } else {
                "Carol"
            };
            Appearance {
                character_id: character,
                character_name: name.to_string(),
                character_avatar: None,
                video_id: self.video,
                start_time: start,
                end_time: end,
                confidence: 0.9,
                start_frame: (start * FPS) as i32,
                end_frame: (end * FPS) as i32,
            }
        }

        fn find(&self, appearances: Vec<Appearance>, include: &[CharacterId], exclude: &[CharacterId]) -> Vec<Scene> {
            let query = SceneQuery::new(include.to_vec(), exclude.to_vec());
            find_scenes(self.video, appearances, &query).unwrap()
        }
    }

    fn bounds(scenes: &[Scene]) -> Vec<(f64, f64)> {
        scenes.iter().map(|s| (s.start_time, s.end_time)).collect()
    }

    // -- scenarios -----------------------------------------------------------

    #[test]
    fn two_required_characters_yield_their_overlap() {
        let f = Fixture::new();
        let scenes = f.find(vec![f.appear(f.a, 0.0, 10.0), f.appear(f.b, 5.0, 15.0)], &[f.a, f.b], &[]);
        assert_eq!(bounds(&scenes), vec![(5.0, 10.0)]);
        assert_eq!(scenes[0].character_count, 2);
    }

    #[test]
    fn excluded_character_splits_scene() {
        let f = Fixture::new();
        let scenes = f.find(vec![f.appear(f.a, 0.0, 10.0), f.appear(f.b, 3.0, 6.0)], &[f.a], &[f.b]);
        assert_eq!(bounds(&scenes), vec![(0.0, 3.0), (6.0, 10.0)]);
        assert!(scenes.iter().all(|s| !s.has_character(&f.b)));
    }

    #[test]
    fn fully_covering_exclusion_removes_every_scene() {
        let f = Fixture::new();
        let scenes = f.find(vec![f.appear(f.a, 0.0, 10.0), f.appear(f.b, 0.0, 10.0)], &[f.a], &[f.b]);
        assert!(scenes.is_empty());
    }

    #[test]
    fn no_appearances_is_an_empty_list() {
        let f = Fixture::new();
        assert!(f.find(Vec::new(), &[f.a], &[]).is_empty());
        assert!(f.find(Vec::new(), &[], &[]).is_empty());
    }

    // -- roster --------------------------------------------------------------

    #[test]
    fn roster_includes_unrequested_characters_clipped_to_scene() {
        let f = Fixture::new();
        let scenes = f.find(
            vec![f.appear(f.a, 0.0, 10.0), f.appear(f.c, 4.0, 20.0)],
            &[f.a],
            &[],
        );
        assert_eq!(bounds(&scenes), vec![(0.0, 10.0)]);
        let carol = scenes[0].characters.iter().find(|c| c.character_id == f.c).unwrap();
        assert_eq!((carol.start_time, carol.end_time), (4.0, 10.0));
        assert_eq!(carol.name, "Carol");
    }

    #[test]
    fn roster_is_ordered_by_start_time() {
        let f = Fixture::new();
        let scenes = f.find(
            vec![f.appear(f.c, 6.0, 8.0), f.appear(f.a, 0.0, 10.0), f.appear(f.b, 2.0, 9.0)],
            &[f.a],
            &[],
        );
        let order: Vec<_> = scenes[0].characters.iter().map(|c| c.character_id).collect();
        assert_eq!(order, vec![f.a, f.b, f.c]);
    }

    #[test]
    fn scene_confidence_is_highest_contributing_value() {
        let f = Fixture::new();
        let mut first = f.appear(f.a, 0.0, 5.0);
        first.confidence = 0.6;
        let mut second = f.appear(f.a, 4.0, 10.0);
        second.confidence = 0.8;
        let scenes = f.find(vec![first, second], &[f.a], &[]);
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].characters[0].confidence, 0.8);
    }

    #[test]
    fn frames_are_interpolated_at_clipped_bounds() {
        let f = Fixture::new();
        let scenes = f.find(vec![f.appear(f.a, 0.0, 10.0), f.appear(f.b, 4.0, 8.0)], &[f.a, f.b], &[]);
        let scene = &scenes[0];
        assert_eq!((scene.start_frame, scene.end_frame), (100, 200));
        let alice = scene.characters.iter().find(|c| c.character_id == f.a).unwrap();
        assert_eq!((alice.start_frame, alice.end_frame), (100, 200));
    }

    #[test]
    fn tightened_window_excludes_non_shared_time() {
        let f = Fixture::new();
        let scenes = f.find(
            vec![
                f.appear(f.a, 0.0, 10.0),
                f.appear(f.b, 2.0, 8.0),
                f.appear(f.c, 1.0, 12.0),
            ],
            &[f.a, f.b],
            &[],
        );
        assert_eq!(bounds(&scenes), vec![(2.0, 8.0)]);
        let carol = scenes[0].characters.iter().find(|c| c.character_id == f.c).unwrap();
        assert_eq!((carol.start_time, carol.end_time), (2.0, 8.0));
    }

    // -- include / exclude semantics -----------------------------------------

    #[test]
    fn missing_required_character_yields_nothing() {
        let f = Fixture::new();
        assert!(f.find(vec![f.appear(f.a, 0.0, 10.0)], &[f.a, f.b], &[]).is_empty());
    }

    #[test]
    fn empty_include_returns_all_presence_windows() {
        let f = Fixture::new();
        let scenes = f.find(
            vec![f.appear(f.a, 0.0, 5.0), f.appear(f.b, 5.0, 8.0), f.appear(f.c, 20.0, 25.0)],
            &[],
            &[],
        );
        assert_eq!(bounds(&scenes), vec![(0.0, 8.0), (20.0, 25.0)]);
    }

    #[test]
    fn empty_include_with_exclusion_drops_excluded_time() {
        let f = Fixture::new();
        let scenes = f.find(
            vec![f.appear(f.a, 0.0, 10.0), f.appear(f.b, 8.0, 15.0)],
            &[],
            &[f.b],
        );
        assert_eq!(bounds(&scenes), vec![(0.0, 8.0)]);
    }

    #[test]
    fn touching_required_characters_do_not_form_a_scene() {
        let f = Fixture::new();
        let scenes = f.find(vec![f.appear(f.a, 0.0, 5.0), f.appear(f.b, 5.0, 10.0)], &[f.a, f.b], &[]);
        assert!(scenes.is_empty());
    }

    #[test]
    fn point_appearance_inside_range_is_a_zero_length_scene() {
        let f = Fixture::new();
        let scenes = f.find(vec![f.appear(f.a, 0.0, 10.0), f.appear(f.b, 5.0, 5.0)], &[f.a, f.b], &[]);
        assert_eq!(bounds(&scenes), vec![(5.0, 5.0)]);
        assert_eq!(scenes[0].duration, 0.0);
    }

    #[test]
    fn point_exclusion_at_boundary_keeps_the_scene() {
        let f = Fixture::new();
        let scenes = f.find(vec![f.appear(f.a, 0.0, 10.0), f.appear(f.b, 0.0, 0.0)], &[f.a], &[f.b]);
        assert_eq!(bounds(&scenes), vec![(0.0, 10.0)]);
    }

    #[test]
    fn disjoint_exclusions_carve_separate_gaps() {
        let f = Fixture::new();
        let scenes = f.find(
            vec![
                f.appear(f.a, 0.0, 20.0),
                f.appear(f.b, 2.0, 4.0),
                f.appear(f.b, 10.0, 12.0),
            ],
            &[f.a],
            &[f.b],
        );
        assert_eq!(bounds(&scenes), vec![(0.0, 2.0), (4.0, 10.0), (12.0, 20.0)]);
    }

    #[test]
    fn every_scene_honours_include_and_exclude() {
        let f = Fixture::new();
        let d = Uuid::new_v4();
        let appearances = vec![
            f.appear(f.a, 0.0, 30.0),
            f.appear(f.a, 40.0, 55.0),
            f.appear(f.b, 5.0, 12.0),
            f.appear(f.b, 18.0, 45.0),
            f.appear(f.c, 8.0, 9.0),
            f.appear(f.c, 25.0, 25.0),
            f.appear(f.c, 42.0, 60.0),
            f.appear(d, 0.0, 100.0),
        ];
        let queries: Vec<(Vec<CharacterId>, Vec<CharacterId>)> = vec![
            (vec![f.a], vec![]),
            (vec![f.a], vec![f.c]),
            (vec![f.a, f.b], vec![]),
            (vec![f.a, f.b], vec![f.c]),
            (vec![f.b, d], vec![f.a]),
            (vec![], vec![f.c]),
            (vec![f.a, f.b, d], vec![f.c]),
        ];
        for (include, exclude) in queries {
            let scenes = f.find(appearances.clone(), &include, &exclude);
            for scene in &scenes {
                assert!(!scene.characters.is_empty());
                assert!(include.iter().all(|id| scene.has_character(id)));
                assert!(exclude.iter().all(|id| !scene.has_character(id)));
                assert!(scene.start_time <= scene.end_time);
                for c in &scene.characters {
                    assert!(c.start_time >= scene.start_time && c.end_time <= scene.end_time);
                }
            }
            for pair in scenes.windows(2) {
                assert!(pair[0].start_time <= pair[1].start_time);
                assert!(pair[0].end_time <= pair[1].start_time);
            }
        }
    }

    // -- filters -------------------------------------------------------------

    #[test]
    fn low_confidence_appearances_are_ignored() {
        let f = Fixture::new();
        let mut weak = f.appear(f.b, 3.0, 6.0);
        weak.confidence = 0.2;
        let query = SceneQuery {
            min_confidence: Some(0.5),
            ..SceneQuery::new(vec![f.a], vec![f.b])
        };
        let scenes = find_scenes(f.video, vec![f.appear(f.a, 0.0, 10.0), weak], &query).unwrap();
        assert_eq!(bounds(&scenes), vec![(0.0, 10.0)]);
    }

    #[test]
    fn duration_filter_drops_short_and_long_scenes() {
        let f = Fixture::new();
        let appearances = vec![
            f.appear(f.a, 0.0, 1.0),
            f.appear(f.a, 10.0, 15.0),
            f.appear(f.a, 20.0, 40.0),
        ];
        let query = SceneQuery {
            min_duration: Some(2.0),
            max_duration: Some(10.0),
            ..SceneQuery::new(vec![f.a], vec![])
        };
        let scenes = find_scenes(f.video, appearances, &query).unwrap();
        assert_eq!(bounds(&scenes), vec![(10.0, 15.0)]);
        assert_eq!(scenes[0].scene_id, "segment_1_10.000_15.000");
    }

    #[test]
    fn invalid_query_is_rejected() {
        let f = Fixture::new();
        let query = SceneQuery::new(vec![f.a], vec![f.a]);
        assert_matches!(
            find_scenes(f.video, Vec::new(), &query),
            Err(CoreError::Validation(_))
        );
    }

    // -- numbering -----------------------------------------------------------

    #[test]
    fn scenes_are_numbered_in_order_with_formatted_times() {
        let f = Fixture::new();
        let scenes = f.find(
            vec![f.appear(f.a, 0.0, 2.5), f.appear(f.a, 3661.0, 3700.25)],
            &[f.a],
            &[],
        );
        assert_eq!(scenes[0].scene_id, "segment_1_0.000_2.500");
        assert_eq!(scenes[1].scene_id, "segment_2_3661.000_3700.250");
        assert_eq!(scenes[1].start_time_formatted, "01:01:01");
        assert_eq!(scenes[1].end_time_formatted, "01:01:40");
    }
}
