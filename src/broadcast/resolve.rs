//! Shape compatibility resolution

use super::BroadcastConfig;
use crate::error::{Error, Result};
use crate::tensor::Shape;
use smallvec::SmallVec;

/// Output of shape resolution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// Broadcast output shape
    pub shape: Shape,
    /// For each input, the output dimension its first dimension aligns with
    pub alignments: SmallVec<[usize; 4]>,
}

/// Resolve the output shape of an elementwise operation
///
/// Pure function of its inputs. See the [module docs](super) for the rules.
///
/// # Errors
///
/// - `ShapeMismatch` if any aligned dimension pair is incompatible
/// - `InvalidAxis` if `config.axis` puts the smaller shape out of bounds
/// - `UnsupportedArity` for no shapes, or an axis with other than two shapes
///
/// # Example
///
/// ```
/// use tensorwise::broadcast::{BroadcastConfig, resolve};
///
/// let r = resolve(&[&[3, 1], &[4]], BroadcastConfig::NUMPY).unwrap();
/// assert_eq!(r.shape, [3, 4]);
/// assert_eq!(r.alignments.as_slice(), &[0, 1]);
/// ```
pub fn resolve(shapes: &[&[usize]], config: BroadcastConfig) -> Result<Resolved> {
    if shapes.is_empty() {
        return Err(Error::arity("broadcast", "at least 1", 0));
    }

    let resolved = if !config.enabled {
        resolve_exact(shapes)?
    } else if let Some(axis) = config.axis {
        resolve_axis(shapes, axis)?
    } else {
        resolve_trailing(shapes)?
    };

    tracing::trace!(
        ?shapes,
        ?config,
        output = %resolved.shape,
        "resolved broadcast shape"
    );
    Ok(resolved)
}

/// Compute the trailing-aligned broadcast shape of two shapes
///
/// Returns None if the shapes are incompatible.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Shape> {
    resolve_trailing(&[a, b]).ok().map(|r| r.shape)
}

fn resolve_exact(shapes: &[&[usize]]) -> Result<Resolved> {
    let first = shapes[0];
    if let Some(other) = shapes.iter().find(|s| **s != first) {
        return Err(Error::shape_mismatch(first, other));
    }

    Ok(Resolved {
        shape: Shape::from(first),
        alignments: SmallVec::from_elem(0, shapes.len()),
    })
}

fn resolve_trailing(shapes: &[&[usize]]) -> Result<Resolved> {
    let out_rank = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let alignments: SmallVec<[usize; 4]> = shapes.iter().map(|s| out_rank - s.len()).collect();

    let mut shape = Shape::with_capacity(out_rank);
    for pos in 0..out_rank {
        let mut dim = 1;
        // Input that last set `dim` to something other than 1, for error reporting
        let mut owner = None;

        for (k, (s, &align)) in shapes.iter().zip(alignments.iter()).enumerate() {
            if pos < align {
                continue;
            }
            let d = s[pos - align];
            if d == dim || d == 1 {
                continue;
            }
            if dim == 1 {
                dim = d;
                owner = Some(k);
            } else {
                let lhs = owner.map_or(shapes[0], |o| shapes[o]);
                return Err(Error::shape_mismatch(lhs, s));
            }
        }

        shape.push(dim);
    }

    Ok(Resolved { shape, alignments })
}

fn resolve_axis(shapes: &[&[usize]], axis: usize) -> Result<Resolved> {
    if shapes.len() != 2 {
        return Err(Error::arity("axis broadcast", "2", shapes.len()));
    }

    // On equal ranks the second input is the one being aligned
    let (large, small) = if shapes[0].len() >= shapes[1].len() {
        (0, 1)
    } else {
        (1, 0)
    };
    let (ls, ss) = (shapes[large], shapes[small]);

    if axis + ss.len() > ls.len() {
        return Err(Error::InvalidAxis {
            axis: axis as i64,
            rank: ls.len(),
        });
    }

    let mut shape = Shape::with_capacity(ls.len());
    for (pos, &l) in ls.iter().enumerate() {
        let s = match pos.checked_sub(axis).and_then(|i| ss.get(i)) {
            Some(&s) => s,
            None => {
                shape.push(l);
                continue;
            }
        };
        if l == s || s == 1 {
            shape.push(l);
        } else if l == 1 {
            shape.push(s);
        } else {
            return Err(Error::shape_mismatch(shapes[0], shapes[1]));
        }
    }

    let mut alignments = SmallVec::from_elem(0, 2);
    alignments[small] = axis;
    Ok(Resolved { shape, alignments })
}
