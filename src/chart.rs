//! Chart geometry: the twelve house cells of each layout and the placement
//! of planet labels inside them.
//!
//! All layouts live in a square of side [`EXTENT`] with the y axis pointing
//! up. Renderers flip it as needed.

use crate::{ChartInfo, House, PlanetPosition, ZodiacSign};
use serde::{Deserialize, Serialize};

pub const EXTENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    fn polar(center: Point, radius: f64, degrees: f64) -> Self {
        let angle = degrees.to_radians();
        Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    }
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Twelve rhombi on a 10x10 grid.
    #[default]
    Diamond,
    /// Square with both diagonals and an inscribed diamond.
    NorthIndian,
    /// Twelve 30 degree sectors of a ring.
    Wheel,
}

/// How signs are assigned to houses.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum HouseBasis {
    /// House n holds sign n.
    #[default]
    Sign,
    /// House 1 holds the ascendant's sign.
    WholeSign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub house: House,
    pub outline: Vec<Point>,
    pub anchor: Point,
}

impl Cell {
    fn from_polygon(house: House, outline: Vec<Point>) -> Self {
        let anchor = centroid(&outline);
        Cell {
            house,
            outline,
            anchor,
        }
    }

    /// Even-odd test against the cell outline.
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        let n = self.outline.len();
        for i in 0..n {
            let a = self.outline[i];
            let b = self.outline[(i + n - 1) % n];
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
        }
        inside
    }
}

/// Area centroid of a simple polygon (shoelace formula).
pub fn centroid(points: &[Point]) -> Point {
    let n = points.len();
    let (mut area, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let (p, q) = (points[i], points[(i + 1) % n]);
        let cross = p.x * q.y - q.x * p.y;
        area += cross;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    if area.abs() < f64::EPSILON {
        let count = n.max(1) as f64;
        return Point::new(
            points.iter().map(|p| p.x).sum::<f64>() / count,
            points.iter().map(|p| p.y).sum::<f64>() / count,
        );
    }
    area *= 0.5;
    Point::new(cx / (6.0 * area), cy / (6.0 * area))
}

const DIAMOND_CELLS: [[(f64, f64); 4]; 12] = [
    [(5.0, 9.0), (6.0, 8.0), (5.0, 7.0), (4.0, 8.0)],
    [(6.0, 8.0), (7.0, 7.0), (6.0, 6.0), (5.0, 7.0)],
    [(7.0, 7.0), (8.0, 6.0), (7.0, 5.0), (6.0, 6.0)],
    [(6.0, 6.0), (7.0, 5.0), (6.0, 4.0), (5.0, 5.0)],
    [(5.0, 5.0), (6.0, 4.0), (5.0, 3.0), (4.0, 4.0)],
    [(4.0, 4.0), (5.0, 3.0), (4.0, 2.0), (3.0, 3.0)],
    [(3.0, 3.0), (4.0, 2.0), (3.0, 1.0), (2.0, 2.0)],
    [(4.0, 8.0), (5.0, 7.0), (4.0, 6.0), (3.0, 7.0)],
    [(3.0, 7.0), (4.0, 6.0), (3.0, 5.0), (2.0, 6.0)],
    [(2.0, 6.0), (3.0, 5.0), (2.0, 4.0), (1.0, 5.0)],
    [(1.0, 5.0), (2.0, 4.0), (1.0, 3.0), (0.0, 4.0)],
    [(2.0, 2.0), (3.0, 1.0), (2.0, 0.0), (1.0, 1.0)],
];

const WHEEL_INNER_RADIUS: f64 = 1.6;
const WHEEL_OUTER_RADIUS: f64 = 4.8;
const WHEEL_ARC_STEPS: usize = 8;

impl Layout {
    pub fn cells(&self) -> Vec<Cell> {
        match self {
            Layout::Diamond => diamond_cells(),
            Layout::NorthIndian => north_indian_cells(),
            Layout::Wheel => wheel_cells(),
        }
    }

    /// Vertical spacing between stacked labels, in chart units.
    pub fn line_height(&self) -> f64 {
        match self {
            Layout::Diamond => 0.26,
            Layout::NorthIndian => 0.42,
            Layout::Wheel => 0.34,
        }
    }
}

fn diamond_cells() -> Vec<Cell> {
    House::all()
        .zip(DIAMOND_CELLS.iter())
        .map(|(house, corners)| {
            let outline = corners.iter().map(|&(x, y)| Point::new(x, y)).collect();
            Cell::from_polygon(house, outline)
        })
        .collect()
}

fn north_indian_cells() -> Vec<Cell> {
    let s = EXTENT;
    let (h, q) = (s / 2.0, s / 4.0);
    let top_left = Point::new(0.0, s);
    let top_right = Point::new(s, s);
    let bottom_right = Point::new(s, 0.0);
    let bottom_left = Point::new(0.0, 0.0);
    let top = Point::new(h, s);
    let right = Point::new(s, h);
    let bottom = Point::new(h, 0.0);
    let left = Point::new(0.0, h);
    let center = Point::new(h, h);
    let inner_tl = Point::new(q, s - q);
    let inner_tr = Point::new(s - q, s - q);
    let inner_br = Point::new(s - q, q);
    let inner_bl = Point::new(q, q);

    // House 1 is the top kite; the rest follow counter-clockwise.
    let polygons = [
        vec![top, inner_tl, center, inner_tr],
        vec![top_left, inner_tl, top],
        vec![top_left, left, inner_tl],
        vec![left, inner_bl, center, inner_tl],
        vec![left, bottom_left, inner_bl],
        vec![bottom_left, bottom, inner_bl],
        vec![bottom, inner_br, center, inner_bl],
        vec![bottom, bottom_right, inner_br],
        vec![bottom_right, right, inner_br],
        vec![right, inner_tr, center, inner_br],
        vec![right, top_right, inner_tr],
        vec![top_right, top, inner_tr],
    ];
    House::all()
        .zip(polygons)
        .map(|(house, outline)| Cell::from_polygon(house, outline))
        .collect()
}

fn wheel_cells() -> Vec<Cell> {
    let center = Point::new(EXTENT / 2.0, EXTENT / 2.0);
    House::all()
        .map(|house| {
            let start = 180.0 + 30.0 * f64::from(house.number() - 1);
            let angles: Vec<f64> = (0..=WHEEL_ARC_STEPS)
                .map(|step| start + 30.0 * step as f64 / WHEEL_ARC_STEPS as f64)
                .collect();
            let mut outline: Vec<Point> = angles
                .iter()
                .map(|&a| Point::polar(center, WHEEL_OUTER_RADIUS, a))
                .collect();
            outline.extend(
                angles
                    .iter()
                    .rev()
                    .map(|&a| Point::polar(center, WHEEL_INNER_RADIUS, a)),
            );
            let anchor = Point::polar(
                center,
                (WHEEL_INNER_RADIUS + WHEEL_OUTER_RADIUS) / 2.0,
                start + 15.0,
            );
            Cell {
                house,
                outline,
                anchor,
            }
        })
        .collect()
}

pub fn sign_for_house(house: House, basis: HouseBasis, ascendant: ZodiacSign) -> ZodiacSign {
    let offset = match basis {
        HouseBasis::Sign => 0,
        HouseBasis::WholeSign => ascendant as u8,
    };
    let index = (house.number() - 1 + offset) % 12;
    ZodiacSign::from_number(index + 1).unwrap_or(ZodiacSign::Aries)
}

pub fn house_for_sign(sign: ZodiacSign, basis: HouseBasis, ascendant: ZodiacSign) -> House {
    let offset = match basis {
        HouseBasis::Sign => 0,
        HouseBasis::WholeSign => ascendant as u8,
    };
    let index = (sign as u8 + 12 - offset) % 12;
    House::from_index(index as usize + 1).unwrap_or(House::First)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedCell {
    pub cell: Cell,
    pub sign: ZodiacSign,
    pub number_position: Point,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub layout: Layout,
    pub basis: HouseBasis,
    pub ascendant: ZodiacSign,
    pub cells: Vec<PlacedCell>,
}

pub fn label_text(position: &PlanetPosition) -> String {
    let retro = if position.retrograde { " (R)" } else { "" };
    format!("{} {:.2}°{}", position.planet, position.degree, retro)
}

/// Assigns each planet to the cell of its house and stacks the labels
/// that share a cell around its anchor, in body order.
pub fn place(chart: &ChartInfo, layout: Layout, basis: HouseBasis) -> Placement {
    let ascendant = chart.ascendant.sign;
    let line_height = layout.line_height();

    let cells = layout
        .cells()
        .into_iter()
        .map(|cell| {
            let sign = sign_for_house(cell.house, basis, ascendant);
            let texts: Vec<String> = chart
                .planets
                .iter()
                .filter(|p| house_for_sign(p.sign, basis, ascendant) == cell.house)
                .map(label_text)
                .collect();

            let count = texts.len() as f64;
            let labels = texts
                .into_iter()
                .enumerate()
                .map(|(i, text)| Label {
                    text,
                    position: Point::new(
                        cell.anchor.x,
                        cell.anchor.y + ((count - 1.0) / 2.0 - i as f64) * line_height,
                    ),
                })
                .collect();
            let number_position = if count == 0.0 {
                cell.anchor
            } else {
                Point::new(
                    cell.anchor.x,
                    cell.anchor.y + (count / 2.0 + 0.5) * line_height,
                )
            };

            PlacedCell {
                cell,
                sign,
                number_position,
                labels,
            }
        })
        .collect();

    Placement {
        layout,
        basis,
        ascendant,
        cells,
    }
}
