//! Improved Gradient Noise
//!
//! Reference "improved noise": fixed 256-entry permutation, quintic fade,
//! twelve cube-edge gradients (plus four repeats) picked by the low hash bits.
//! The island silhouette is a direct function of this exact curve, so the
//! table and the fade must not be tuned.

/// Ken Perlin's reference permutation.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// 3D gradient noise over a doubled permutation table.
///
/// Built once per terrain and shared read-only by every sampling worker.
/// Seeds are applied by the caller as an input coordinate, never by
/// reshuffling the table.
#[derive(Clone)]
pub struct ImprovedNoise {
    perm: [usize; 512],
}

impl ImprovedNoise {
    pub fn new() -> Self {
        let mut perm = [0usize; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = PERMUTATION[i & 255] as usize;
        }
        Self { perm }
    }

    /// Sample the noise field. Returns zero at every integer lattice point and
    /// stays roughly within [-1, 1].
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.perm;

        let floor_x = x.floor();
        let floor_y = y.floor();
        let floor_z = z.floor();

        let cx = (floor_x as i64 & 255) as usize;
        let cy = (floor_y as i64 & 255) as usize;
        let cz = (floor_z as i64 & 255) as usize;

        let x = x - floor_x;
        let y = y - floor_y;
        let z = z - floor_z;
        let x1 = x - 1.0;
        let y1 = y - 1.0;
        let z1 = z - 1.0;

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let a = p[cx] + cy;
        let aa = p[a] + cz;
        let ab = p[a + 1] + cz;
        let b = p[cx + 1] + cy;
        let ba = p[b] + cz;
        let bb = p[b + 1] + cz;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x1, y, z)),
                lerp(u, grad(p[ab], x, y1, z), grad(p[bb], x1, y1, z)),
            ),
            lerp(
                v,
                lerp(u, grad(p[aa + 1], x, y, z1), grad(p[ba + 1], x1, y, z1)),
                lerp(u, grad(p[ab + 1], x, y1, z1), grad(p[bb + 1], x1, y1, z1)),
            ),
        )
    }
}

impl Default for ImprovedNoise {
    fn default() -> Self {
        Self::new()
    }
}

/// Quintic ease curve 6t^5 - 15t^4 + 10t^3.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
