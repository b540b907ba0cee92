pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u16(u16::from(px[0]), a) as u8;
        px[1] = mul_div255_u16(u16::from(px[1]), a) as u8;
        px[2] = mul_div255_u16(u16::from(px[2]), a) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div255_rounds() {
        assert_eq!(mul_div255_u16(255, 255), 255);
        assert_eq!(mul_div255_u16(0, 255), 0);
        assert_eq!(mul_div255_u16(128, 128), 64);
    }

    #[test]
    fn premul_zero_alpha_clears_color() {
        let mut px = vec![200u8, 100, 50, 0];
        premultiply_rgba8_in_place(&mut px);
        assert_eq!(px, vec![0, 0, 0, 0]);
    }

    #[test]
    fn premul_then_unpremul_is_close() {
        let mut px = vec![100u8, 50, 200, 128];
        premultiply_rgba8_in_place(&mut px);
        assert_eq!(px, vec![50, 25, 100, 128]);
        unpremultiply_rgba8_in_place(&mut px);
        for (got, want) in px.iter().zip([100u8, 50, 200, 128]) {
            assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
        }
    }
}
