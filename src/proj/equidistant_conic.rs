//! Equidistant Conic projection, one or two standard parallels.

use crate::constants::EPSLN;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, msfn, MeridianArc};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct EquidistantConic {
    a: f64,
    lon0: f64,
    arc: MeridianArc,
    ns: f64,
    g: f64,
    rh: f64,
}

impl EquidistantConic {
    /// `lat1` defaults to `lat0`; a second parallel is used only when
    /// `lat2` is present and differs from `lat1`.
    pub fn new(params: &ProjParams) -> Result<Self, ProjError> {
        let lat1 = params.lat1.unwrap_or(params.lat0);
        let lat2 = params.lat2.unwrap_or(lat1);
        if (lat1 + lat2).abs() < EPSLN {
            return Err(ProjError::Configuration(
                "eqdc standard parallels are equal and opposite".to_string(),
            ));
        }
        let e = params.e;
        let arc = MeridianArc::new(params.es);

        let (sin1, cos1) = lat1.sin_cos();
        let ms1 = msfn(e, sin1, cos1);
        let ml1 = arc.distance(lat1);

        let ns = if (lat1 - lat2).abs() >= EPSLN {
            let (sin2, cos2) = lat2.sin_cos();
            let ms2 = msfn(e, sin2, cos2);
            let ml2 = arc.distance(lat2);
            (ms1 - ms2) / (ml2 - ml1)
        } else {
            sin1
        };
        if ns.abs() < EPSLN {
            return Err(ProjError::Configuration(
                "eqdc cone constant is zero".to_string(),
            ));
        }
        let g = ml1 + ms1 / ns;
        let rh = params.a * (g - arc.distance(params.lat0));

        Ok(Self {
            a: params.a,
            lon0: params.long0,
            arc,
            ns,
            g,
            rh,
        })
    }
}

impl Projection for EquidistantConic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let rh1 = self.a * (self.g - self.arc.distance(lat));
        let theta = self.ns * adjust_lon(lon - self.lon0);
        Ok((rh1 * theta.sin(), self.rh - rh1 * theta.cos()))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let y = self.rh - y;
        let (rh1, con) = if self.ns >= 0.0 {
            (x.hypot(y), 1.0)
        } else {
            (-x.hypot(y), -1.0)
        };
        let theta = if rh1 != 0.0 {
            (con * x).atan2(con * y)
        } else {
            0.0
        };
        let lat = self.arc.latitude(self.g - rh1 / self.a)?;
        let lon = adjust_lon(self.lon0 + theta / self.ns);
        Ok((lon, lat))
    }
}
