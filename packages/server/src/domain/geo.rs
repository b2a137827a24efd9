//! Geo query domain logic.
//!
//! Pure functions for distance filtering and greedy clustering. They take the
//! scanned events by value and never touch the store, so they are easy to test.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::{error::DomainError, value_object::EventId};

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A validated WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let d_phi = (other.latitude - self.latitude).to_radians();
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        // clamp guards against a > 1.0 from rounding near antipodes
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_KM * c
    }

    /// Spherical mean of the given points.
    ///
    /// Averages the unit vectors and projects the sum back onto the sphere, so
    /// groups straddling the antimeridian or a pole stay next to their members.
    /// A single point is returned unchanged. Returns `None` for an empty slice
    /// or when the vectors cancel out (e.g. two antipodal points).
    fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
        if let [point] = points {
            return Some(*point);
        }
        let (mut x, mut y, mut z) = (0.0_f64, 0.0_f64, 0.0_f64);
        for point in points {
            let (phi, lambda) = (point.latitude.to_radians(), point.longitude.to_radians());
            x += phi.cos() * lambda.cos();
            y += phi.cos() * lambda.sin();
            z += phi.sin();
        }
        let norm = (x * x + y * y + z * z).sqrt();
        if norm < 1e-12 {
            return None;
        }

        let horizontal = x.hypot(y);
        let latitude = z.atan2(horizontal).to_degrees().clamp(-90.0, 90.0);
        // longitude is undefined at the poles
        let longitude = if horizontal < 1e-12 {
            0.0
        } else {
            y.atan2(x).to_degrees().clamp(-180.0, 180.0)
        };
        Some(GeoPoint {
            latitude,
            longitude,
        })
    }
}

/// An event read from the store. Immutable for the duration of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub location: GeoPoint,
    /// Opaque attributes passed through to clients.
    pub attributes: Map<String, Value>,
}

impl Event {
    pub fn new(id: EventId, location: GeoPoint, attributes: Map<String, Value>) -> Self {
        Self {
            id,
            location,
            attributes,
        }
    }
}

/// A greedy grouping of nearby events.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// The event the cluster was seeded at.
    pub seed_id: EventId,
    /// Centroid of the members.
    pub representative_point: GeoPoint,
    pub member_event_ids: BTreeSet<EventId>,
    pub count: usize,
}

/// One entry of a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    Event(Event),
    Cluster(Cluster),
}

/// The map viewport a query was issued from. Echoed back with the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: Option<f64>,
}

/// Validated query parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoQuery {
    pub center: GeoPoint,
    pub max_distance_km: f64,
    /// Values `<= 0` disable clustering.
    pub cluster_threshold_km: f64,
}

impl GeoQuery {
    pub fn new(
        latitude: f64,
        longitude: f64,
        max_distance_km: f64,
        cluster_threshold_km: f64,
    ) -> Result<Self, DomainError> {
        let center = GeoPoint::new(latitude, longitude)?;
        if !max_distance_km.is_finite() || max_distance_km < 0.0 {
            return Err(DomainError::InvalidDistance {
                field: "distance",
                value: max_distance_km,
            });
        }
        if !cluster_threshold_km.is_finite() {
            return Err(DomainError::InvalidDistance {
                field: "cluster threshold",
                value: cluster_threshold_km,
            });
        }
        Ok(Self {
            center,
            max_distance_km,
            cluster_threshold_km,
        })
    }

    pub fn clustering_enabled(&self) -> bool {
        self.cluster_threshold_km > 0.0
    }

    /// Filter and (optionally) cluster a full event scan.
    pub fn evaluate(&self, events: Vec<Event>) -> Vec<FeedItem> {
        let nearby = filter_within(events, &self.center, self.max_distance_km);

        if !self.clustering_enabled() {
            return nearby.into_iter().map(FeedItem::Event).collect();
        }

        cluster_greedy(nearby, self.cluster_threshold_km)
            .into_iter()
            .map(FeedItem::Cluster)
            .collect()
    }
}

/// Keep events within `max_distance_km` of `center` (inclusive), ordered by id.
pub fn filter_within(events: Vec<Event>, center: &GeoPoint, max_distance_km: f64) -> Vec<Event> {
    let mut nearby: Vec<Event> = events
        .into_iter()
        .filter(|event| center.distance_km(&event.location) <= max_distance_km)
        .collect();
    nearby.sort_by(|a, b| a.id.cmp(&b.id));
    nearby
}

/// Single-pass greedy clustering.
///
/// Events are visited in id order. Each unassigned event seeds a cluster that
/// absorbs every later unassigned event within `threshold_km` of the seed. An
/// event within range of several seeds goes to the first one visited.
pub fn cluster_greedy(mut events: Vec<Event>, threshold_km: f64) -> Vec<Cluster> {
    events.sort_by(|a, b| a.id.cmp(&b.id));

    let mut assigned = vec![false; events.len()];
    let mut clusters = Vec::new();

    for seed_idx in 0..events.len() {
        if assigned[seed_idx] {
            continue;
        }
        assigned[seed_idx] = true;
        let seed = &events[seed_idx];
        let mut members = vec![seed_idx];

        for idx in (seed_idx + 1)..events.len() {
            if !assigned[idx] && seed.location.distance_km(&events[idx].location) <= threshold_km
            {
                assigned[idx] = true;
                members.push(idx);
            }
        }

        let points: Vec<GeoPoint> = members.iter().map(|&i| events[i].location).collect();
        clusters.push(Cluster {
            seed_id: seed.id.clone(),
            representative_point: GeoPoint::centroid(&points).unwrap_or(seed.location),
            member_event_ids: members.iter().map(|&i| events[i].id.clone()).collect(),
            count: members.len(),
        });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A point on the equator `km` kilometres east of (0, 0).
    fn east_of_origin(km: f64) -> GeoPoint {
        let longitude = (km / EARTH_RADIUS_KM).to_degrees();
        GeoPoint::new(0.0, longitude).unwrap()
    }

    fn event(id: &str, location: GeoPoint) -> Event {
        Event::new(EventId::new(id.to_string()).unwrap(), location, Map::new())
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(0.0, 0.0).unwrap()
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_geo_point_rejects_out_of_range() {
        // テスト項目: 範囲外・非有限の座標はエラーになる
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(
            GeoPoint::new(90.5, 0.0),
            Err(DomainError::InvalidLatitude(90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.1),
            Err(DomainError::InvalidLongitude(-180.1))
        );
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_distance_along_equator() {
        // テスト項目: 赤道上の距離が期待どおり計算される
        // given (前提条件):
        let a = origin();
        let b = east_of_origin(15.0);

        // when (操作):
        let d = a.distance_km(&b);

        // then (期待する結果):
        assert!((d - 15.0).abs() < 1e-9);
        assert!((b.distance_km(&a) - d).abs() < 1e-12);
    }

    #[test]
    fn test_distance_tokyo_osaka() {
        // テスト項目: 東京駅〜大阪駅の大圏距離がおよそ 403km になる
        // given (前提条件):
        let tokyo = GeoPoint::new(35.6812, 139.7671).unwrap();
        let osaka = GeoPoint::new(34.7025, 135.4959).unwrap();

        // when (操作):
        let d = tokyo.distance_km(&osaka);

        // then (期待する結果):
        assert!((d - 403.0).abs() < 5.0, "distance was {}", d);
    }

    #[test]
    fn test_filter_within_keeps_events_inside_radius() {
        // テスト項目: 中心 (0,0)、距離 [5, 15, 25]、最大 20 の場合 5 と 15 が残る
        // given (前提条件):
        let events = vec![
            event("c", east_of_origin(25.0)),
            event("a", east_of_origin(5.0)),
            event("b", east_of_origin(15.0)),
        ];

        // when (操作):
        let result = filter_within(events, &origin(), 20.0);

        // then (期待する結果):
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_within_bound_is_inclusive() {
        // テスト項目: 最大距離ちょうどのイベントは含まれる
        // given (前提条件):
        let location = east_of_origin(10.0);
        let exact = origin().distance_km(&location);
        let events = vec![event("edge", location)];

        // when (操作):
        let result = filter_within(events, &origin(), exact);

        // then (期待する結果):
        assert_eq!(ids(&result), vec!["edge"]);
    }

    #[test]
    fn test_cluster_greedy_merges_close_events() {
        // テスト項目: 5km と 15km のイベントは閾値 12km で 1 つのクラスタになる
        // given (前提条件):
        let events = vec![event("a", east_of_origin(5.0)), event("b", east_of_origin(15.0))];

        // when (操作):
        let clusters = cluster_greedy(events, 12.0);

        // then (期待する結果):
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 2);
        assert_eq!(clusters[0].seed_id.as_str(), "a");
        let centroid = clusters[0].representative_point;
        assert!((origin().distance_km(&centroid) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_cluster_across_antimeridian_stays_near_members() {
        // テスト項目: 経度 ±180 度をまたぐクラスタの代表点がメンバーの近くにある
        // given (前提条件): 約 2.2km 離れた (0, 179.99) と (0, -179.99)
        let east = GeoPoint::new(0.0, 179.99).unwrap();
        let west = GeoPoint::new(0.0, -179.99).unwrap();
        let events = vec![event("a", east), event("b", west)];

        // when (操作):
        let clusters = cluster_greedy(events, 5.0);

        // then (期待する結果):
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 2);
        let centroid = clusters[0].representative_point;
        assert!(centroid.distance_km(&east) < 2.0, "centroid was {:?}", centroid);
        assert!(centroid.distance_km(&west) < 2.0, "centroid was {:?}", centroid);
        assert!((centroid.longitude().abs() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_cluster_near_pole_stays_near_members() {
        // テスト項目: 極付近で経度が大きく異なるクラスタの代表点がメンバーの近くにある
        // given (前提条件): 北極から約 1.1km、経度が反対側の 2 点
        let a = GeoPoint::new(89.99, 0.0).unwrap();
        let b = GeoPoint::new(89.99, 180.0).unwrap();
        let events = vec![event("a", a), event("b", b)];

        // when (操作):
        let clusters = cluster_greedy(events, 5.0);

        // then (期待する結果): 代表点は北極付近
        assert_eq!(clusters.len(), 1);
        let centroid = clusters[0].representative_point;
        assert!(centroid.latitude() > 89.99, "centroid was {:?}", centroid);
        assert!(centroid.distance_km(&a) < 2.0);
    }

    #[test]
    fn test_cluster_greedy_first_seed_wins() {
        // テスト項目: 複数のシードの範囲に入るイベントは先に訪れたシードに属する
        // given (前提条件): a=0km, b=8km, c=16km, 閾値 10km
        let events = vec![
            event("c", east_of_origin(16.0)),
            event("b", east_of_origin(8.0)),
            event("a", east_of_origin(0.0)),
        ];

        // when (操作):
        let clusters = cluster_greedy(events, 10.0);

        // then (期待する結果): a が b を吸収し、c は単独のクラスタ
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].seed_id.as_str(), "a");
        assert_eq!(clusters[0].count, 2);
        assert_eq!(clusters[1].seed_id.as_str(), "c");
        assert_eq!(clusters[1].count, 1);
        assert_eq!(clusters[1].representative_point, east_of_origin(16.0));
    }

    #[test]
    fn test_cluster_greedy_assigns_every_event_once() {
        // テスト項目: 全イベントがちょうど 1 つのクラスタに属し、メンバーはシードから閾値以内
        // given (前提条件): 3km 間隔のイベントと離れたイベント
        let positions = [0.0, 3.0, 6.0, 9.0, 12.0, 40.0, 41.0, 90.0];
        let events: Vec<Event> = positions
            .iter()
            .enumerate()
            .map(|(i, km)| event(&format!("e{}", i), east_of_origin(*km)))
            .collect();
        let by_id = events.clone();
        let threshold = 7.0;

        // when (操作):
        let clusters = cluster_greedy(events, threshold);

        // then (期待する結果):
        let total: usize = clusters.iter().map(|c| c.count).sum();
        assert_eq!(total, positions.len());

        let mut seen = BTreeSet::new();
        for cluster in &clusters {
            assert_eq!(cluster.count, cluster.member_event_ids.len());
            let seed = by_id.iter().find(|e| e.id == cluster.seed_id).unwrap();
            for member in &cluster.member_event_ids {
                assert!(seen.insert(member.clone()), "{} assigned twice", member);
                let ev = by_id.iter().find(|e| &e.id == member).unwrap();
                assert!(seed.location.distance_km(&ev.location) <= threshold);
            }
        }
    }

    #[test]
    fn test_query_without_clustering_returns_events() {
        // テスト項目: 閾値 0 の場合はクラスタリングせずイベントを返す
        // given (前提条件):
        let query = GeoQuery::new(0.0, 0.0, 20.0, 0.0).unwrap();
        let events = vec![
            event("a", east_of_origin(5.0)),
            event("b", east_of_origin(15.0)),
            event("c", east_of_origin(25.0)),
        ];

        // when (操作):
        let items = query.evaluate(events);

        // then (期待する結果):
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| matches!(item, FeedItem::Event(_))));
    }

    #[test]
    fn test_query_with_clustering_returns_clusters() {
        // テスト項目: 閾値 12 の場合、5km と 15km のイベントが 1 クラスタにまとまる
        // given (前提条件):
        let query = GeoQuery::new(0.0, 0.0, 20.0, 12.0).unwrap();
        let events = vec![
            event("a", east_of_origin(5.0)),
            event("b", east_of_origin(15.0)),
            event("c", east_of_origin(25.0)),
        ];

        // when (操作):
        let items = query.evaluate(events);

        // then (期待する結果):
        assert_eq!(items.len(), 1);
        match &items[0] {
            FeedItem::Cluster(cluster) => assert_eq!(cluster.count, 2),
            other => panic!("expected a cluster, got {:?}", other),
        }
    }

    #[test]
    fn test_query_negative_threshold_disables_clustering() {
        // テスト項目: 負の閾値はクラスタリング無効として扱われる
        // given (前提条件):
        let query = GeoQuery::new(0.0, 0.0, 20.0, -1.0).unwrap();

        // when (操作) / then (期待する結果):
        assert!(!query.clustering_enabled());
    }

    #[test]
    fn test_query_rejects_invalid_parameters() {
        // テスト項目: 不正な中心座標・距離はエラーになる
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(
            GeoQuery::new(91.0, 0.0, 1.0, 0.0),
            Err(DomainError::InvalidLatitude(91.0))
        );
        assert_eq!(
            GeoQuery::new(0.0, 0.0, -1.0, 0.0),
            Err(DomainError::InvalidDistance {
                field: "distance",
                value: -1.0
            })
        );
        assert!(GeoQuery::new(0.0, 0.0, 1.0, f64::NAN).is_err());
    }
}
