//! Map column of the listing: project locations from the search results.

use leptos::prelude::*;
use serde_json::Value;
use taskmap_common::{ProjectQuery, QueryUpdate};

/// A project location extracted from the map results.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMarker {
    pub project_id: u64,
    pub lon: f64,
    pub lat: f64,
}

/// Point features of a GeoJSON collection that carry a `projectId`.
pub fn markers(map_results: &Value) -> Vec<ProjectMarker> {
    let Some(features) = map_results.get("features").and_then(Value::as_array) else {
        return Vec::new();
    };
    features
        .iter()
        .filter_map(|feature| {
            let project_id = feature.pointer("/properties/projectId")?.as_u64()?;
            let coords = feature.pointer("/geometry/coordinates")?.as_array()?;
            Some(ProjectMarker {
                project_id,
                lon: coords.first()?.as_f64()?,
                lat: coords.get(1)?.as_f64()?,
            })
        })
        .collect()
}

/// Equirectangular position of a marker inside a 360×180 view box.
fn plot(marker: &ProjectMarker) -> (f64, f64) {
    (marker.lon + 180.0, 90.0 - marker.lat)
}

/// Overview map of the projects in the current results.  A location filter
/// can be dropped from here.
#[component]
pub fn ProjectsMap(
    map_results: Option<Value>,
    query: ProjectQuery,
    set_query: Callback<QueryUpdate>,
) -> impl IntoView {
    let markers = map_results.as_ref().map(markers).unwrap_or_default();
    let location = query.get_str("location").map(String::from);

    let dots = markers
        .into_iter()
        .map(|marker| {
            let (x, y) = plot(&marker);
            view! {
                <circle
                    cx=x.to_string()
                    cy=y.to_string()
                    r="1.5"
                    class="project-marker"
                    data-project-id=marker.project_id.to_string()
                />
            }
        })
        .collect_view();

    view! {
        <div class="projects-map">
            <svg viewBox="0 0 360 180" class="projects-map-canvas" preserveAspectRatio="xMidYMid meet">
                <rect width="360" height="180" class="projects-map-bg"/>
                {dots}
            </svg>
            {location.map(|location| view! {
                <button
                    class="btn btn-link"
                    on:click=move |_| set_query.run(QueryUpdate::new().clear("location").clear("page"))
                >
                    "Clear location: " {location}
                </button>
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_from_feature_collection() {
        let value = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"projectId": 7},
                 "geometry": {"type": "Point", "coordinates": [-70.5, 18.25]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}
            ]
        });
        let found = markers(&value);
        assert_eq!(
            found,
            vec![ProjectMarker {
                project_id: 7,
                lon: -70.5,
                lat: 18.25
            }]
        );
        assert_eq!(plot(&found[0]), (109.5, 71.75));
    }

    #[test]
    fn test_markers_without_features() {
        assert!(markers(&serde_json::json!({})).is_empty());
    }
}
