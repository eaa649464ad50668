//! Well-known binary for the 2D geometry types stored in GeoPackages. Writing is always
//! little endian, reading accepts both byte orders.

use crate::errors::{VectorError, VectorResult};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};

const POINT: u32 = 1;
const LINE_STRING: u32 = 2;
const POLYGON: u32 = 3;
const MULTI_POINT: u32 = 4;
const MULTI_LINE_STRING: u32 = 5;
const MULTI_POLYGON: u32 = 6;

pub(crate) fn write_geometry(out: &mut Vec<u8>, geometry: &Geometry<f64>) -> VectorResult<()> {
    match geometry {
        Geometry::Point(point) => {
            header(out, POINT);
            coord(out, point.0);
        }
        Geometry::LineString(line) => {
            header(out, LINE_STRING);
            coords(out, &line.0);
        }
        Geometry::Polygon(polygon) => {
            header(out, POLYGON);
            polygon_rings(out, polygon);
        }
        Geometry::MultiPoint(points) => {
            header(out, MULTI_POINT);
            count(out, points.0.len());
            for point in &points.0 {
                header(out, POINT);
                coord(out, point.0);
            }
        }
        Geometry::MultiLineString(lines) => {
            header(out, MULTI_LINE_STRING);
            count(out, lines.0.len());
            for line in &lines.0 {
                header(out, LINE_STRING);
                coords(out, &line.0);
            }
        }
        Geometry::MultiPolygon(polygons) => {
            header(out, MULTI_POLYGON);
            count(out, polygons.0.len());
            for polygon in &polygons.0 {
                header(out, POLYGON);
                polygon_rings(out, polygon);
            }
        }
        other => {
            return Err(VectorError::UnsupportedGeometry(format!("{other:?}")));
        }
    }
    Ok(())
}

fn header(out: &mut Vec<u8>, kind: u32) {
    out.push(1);
    out.extend_from_slice(&kind.to_le_bytes());
}

fn count(out: &mut Vec<u8>, n: usize) {
    out.extend_from_slice(&(n as u32).to_le_bytes());
}

fn coord(out: &mut Vec<u8>, c: Coord<f64>) {
    out.extend_from_slice(&c.x.to_le_bytes());
    out.extend_from_slice(&c.y.to_le_bytes());
}

fn coords(out: &mut Vec<u8>, cs: &[Coord<f64>]) {
    count(out, cs.len());
    cs.iter().for_each(|c| coord(out, *c));
}

fn polygon_rings(out: &mut Vec<u8>, polygon: &Polygon<f64>) {
    count(out, 1 + polygon.interiors().len());
    coords(out, &polygon.exterior().0);
    for ring in polygon.interiors() {
        coords(out, &ring.0);
    }
}

pub(crate) fn read_geometry(bytes: &[u8]) -> VectorResult<Geometry<f64>> {
    let mut cursor = Cursor { bytes, pos: 0, little_endian: true };
    cursor.geometry()
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    little_endian: bool,
}

impl Cursor<'_> {
    fn take<const N: usize>(&mut self) -> VectorResult<[u8; N]> {
        let slice = self
            .bytes
            .get(self.pos..self.pos + N)
            .ok_or_else(|| VectorError::Wkb(format!("unexpected end at byte {}", self.pos)))?;
        self.pos += N;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        Ok(buf)
    }

    fn u32(&mut self) -> VectorResult<u32> {
        let buf = self.take::<4>()?;
        Ok(if self.little_endian { u32::from_le_bytes(buf) } else { u32::from_be_bytes(buf) })
    }

    fn f64(&mut self) -> VectorResult<f64> {
        let buf = self.take::<8>()?;
        Ok(if self.little_endian { f64::from_le_bytes(buf) } else { f64::from_be_bytes(buf) })
    }

    fn coord(&mut self) -> VectorResult<Coord<f64>> {
        Ok(Coord { x: self.f64()?, y: self.f64()? })
    }

    fn line(&mut self) -> VectorResult<LineString<f64>> {
        let n = self.u32()?;
        (0..n).map(|_| self.coord()).collect::<VectorResult<Vec<_>>>().map(LineString::new)
    }

    fn polygon(&mut self) -> VectorResult<Polygon<f64>> {
        let n = self.u32()?;
        if n == 0 {
            return Ok(Polygon::new(LineString::new(vec![]), vec![]));
        }
        let exterior = self.line()?;
        let interiors = (1..n).map(|_| self.line()).collect::<VectorResult<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    /// Byte order marker and type code of the next (sub)geometry
    fn header(&mut self) -> VectorResult<u32> {
        self.little_endian = match self.take::<1>()?[0] {
            0 => false,
            1 => true,
            other => return Err(VectorError::Wkb(format!("invalid byte order marker {other}"))),
        };
        Ok(self.u32()?)
    }

    fn expect_kind(&mut self, kind: u32) -> VectorResult<()> {
        match self.header()? {
            found if found == kind => Ok(()),
            found => Err(VectorError::Wkb(format!("expected geometry type {kind}, found {found}"))),
        }
    }

    fn geometry(&mut self) -> VectorResult<Geometry<f64>> {
        let geometry = match self.header()? {
            POINT => Point(self.coord()?).into(),
            LINE_STRING => self.line()?.into(),
            POLYGON => self.polygon()?.into(),
            MULTI_POINT => {
                let n = self.u32()?;
                let points = (0..n)
                    .map(|_| {
                        self.expect_kind(POINT)?;
                        self.coord().map(Point)
                    })
                    .collect::<VectorResult<Vec<_>>>()?;
                MultiPoint::new(points).into()
            }
            MULTI_LINE_STRING => {
                let n = self.u32()?;
                let lines = (0..n)
                    .map(|_| {
                        self.expect_kind(LINE_STRING)?;
                        self.line()
                    })
                    .collect::<VectorResult<Vec<_>>>()?;
                MultiLineString::new(lines).into()
            }
            MULTI_POLYGON => {
                let n = self.u32()?;
                let polygons = (0..n)
                    .map(|_| {
                        self.expect_kind(POLYGON)?;
                        self.polygon()
                    })
                    .collect::<VectorResult<Vec<_>>>()?;
                MultiPolygon::new(polygons).into()
            }
            other => return Err(VectorError::Wkb(format!("unsupported geometry type {other}"))),
        };
        Ok(geometry)
    }
}
