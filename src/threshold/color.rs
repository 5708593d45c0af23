//! Color-channel lane cues in HLS space.
//!
//! Each threshold returns the raw channel alongside its mask; the channel is
//! a diagnostic by-product and is not consumed by later stages.
use super::ThresholdBand;
use crate::color::{hls_channel, Channel, HlsChannel};
use crate::error::LaneError;
use crate::image::{Frame, Mask};

#[derive(Clone, Debug)]
pub struct ChannelMask {
    pub channel: Channel,
    pub mask: Mask,
}

fn channel_threshold(
    frame: &Frame<'_>,
    which: HlsChannel,
    thresh: ThresholdBand<u8>,
) -> Result<ChannelMask, LaneError> {
    let rgb = frame.rgb()?;
    let channel = hls_channel(rgb, which);
    let mask = Mask {
        w: channel.w,
        h: channel.h,
        data: channel
            .data
            .iter()
            .map(|&v| thresh.contains(v) as u8)
            .collect(),
    };
    Ok(ChannelMask { channel, mask })
}

/// Threshold the HLS saturation channel.
pub fn s_channel_threshold(
    frame: &Frame<'_>,
    thresh: ThresholdBand<u8>,
) -> Result<ChannelMask, LaneError> {
    channel_threshold(frame, HlsChannel::Saturation, thresh)
}

/// Threshold the HLS hue channel (0..180 scale).
pub fn h_channel_threshold(
    frame: &Frame<'_>,
    thresh: ThresholdBand<u8>,
) -> Result<ChannelMask, LaneError> {
    channel_threshold(frame, HlsChannel::Hue, thresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageRgb8;

    #[test]
    fn saturation_band_is_inclusive() {
        // Pure red has saturation 255, mid gray has 0.
        let data = [255u8, 0, 0, 128, 128, 128];
        let frame = Frame::Rgb(ImageRgb8 {
            w: 2,
            h: 1,
            stride: 6,
            data: &data,
        });
        let out = s_channel_threshold(&frame, ThresholdBand::new(130, 255)).unwrap();
        assert_eq!(out.channel.data, vec![255, 0]);
        assert_eq!(out.mask.data, vec![1, 0]);

        let edge = s_channel_threshold(&frame, ThresholdBand::new(0, 0)).unwrap();
        assert_eq!(edge.mask.data, vec![0, 1]);
    }

    #[test]
    fn hue_band_picks_yellow_over_white() {
        let data = [230u8, 200, 60, 250, 250, 250];
        let frame = Frame::Rgb(ImageRgb8 {
            w: 2,
            h: 1,
            stride: 6,
            data: &data,
        });
        let out = h_channel_threshold(&frame, ThresholdBand::new(15, 100)).unwrap();
        assert_eq!(out.mask.data, vec![1, 0]);
    }
}
