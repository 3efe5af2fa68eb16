// ============================================
// Height Curve - Кривая отклика высоты
// ============================================
// Кусочная кривая Эрмита на ключах (time, value, tangents).
// Вычисление чистое (&self): одну кривую можно читать из любого числа потоков.

use serde::{Deserialize, Serialize};

/// Ключ кривой
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self { time, value, in_tangent, out_tangent }
    }
}

/// Кривая [0,1] -> [0,1] (или произвольная)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct HeightCurve {
    keys: Vec<CurveKey>,
}

impl HeightCurve {
    /// Кривая из ключей (сортируются по времени)
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.retain(|k| k.time.is_finite() && k.value.is_finite());
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Тождественная кривая y = x на [0,1]
    pub fn linear() -> Self {
        Self::new(vec![
            CurveKey::new(0.0, 0.0, 1.0, 1.0),
            CurveKey::new(1.0, 1.0, 1.0, 1.0),
        ])
    }

    /// Постоянная кривая
    pub fn constant(value: f32) -> Self {
        Self::new(vec![CurveKey::new(0.0, value, 0.0, 0.0)])
    }

    /// Кусочно-линейная кривая по точкам (касательные = наклоны соседних отрезков)
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        let mut sorted: Vec<(f32, f32)> = points.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let slope = |a: (f32, f32), b: (f32, f32)| {
            let dt = b.0 - a.0;
            if dt.abs() > f32::EPSILON { (b.1 - a.1) / dt } else { 0.0 }
        };

        let keys = sorted
            .iter()
            .enumerate()
            .map(|(i, &(t, v))| {
                let in_tangent = if i > 0 { slope(sorted[i - 1], (t, v)) } else { 0.0 };
                let out_tangent = if i + 1 < sorted.len() { slope((t, v), sorted[i + 1]) } else { 0.0 };
                CurveKey::new(t, v, in_tangent, out_tangent)
            })
            .collect();
        Self::new(keys)
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Значение кривой в точке t (вне диапазона ключей: крайние значения)
    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // Первый ключ с time > t
        let hi = self.keys.partition_point(|k| k.time <= t);
        let k0 = &self.keys[hi - 1];
        let k1 = &self.keys[hi];

        let dt = k1.time - k0.time;
        if dt <= f32::EPSILON {
            return k1.value;
        }
        let s = (t - k0.time) / dt;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * k0.value + h10 * dt * k0.out_tangent + h01 * k1.value + h11 * dt * k1.in_tangent
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl From<Vec<CurveKey>> for HeightCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<HeightCurve> for Vec<CurveKey> {
    fn from(curve: HeightCurve) -> Self {
        curve.keys
    }
}
