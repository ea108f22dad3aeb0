//! Turns a burst-aligned 288-bit frame into a typed message, selected by the slot type.

use dmr_core::burst_consts::{BURST_BITS, INFO1_OFFSET, INFO2_OFFSET, INFO_BITS, INFO_HALF_BITS};
use dmr_core::edac::bptc;
use dmr_core::edac::crc16::{CRC_MASK_CSBK, CRC_MASK_MBC_HEADER};
use dmr_core::{BitBuffer, PduParseErr, SyncPattern, Timeslot, expect_len};

use crate::enums::data_type::DataType;
use crate::fields::slot_type::SlotType;
use crate::message::{BurstInfo, DmrMessage};
use crate::pdus::csbk::Csbk;
use crate::pdus::data_block::{DataBlock, DataRate, RATE_1_BLOCK_BITS};
use crate::pdus::data_header::DataHeader;

/// Joins the two 98-bit info halves around slot type and sync
pub fn info_bits(frame: &BitBuffer) -> Result<BitBuffer, PduParseErr> {
    expect_len!(frame, BURST_BITS)?;
    let mut info = BitBuffer::new(INFO_BITS);
    for offset in [INFO1_OFFSET, INFO2_OFFSET] {
        let mut half = frame
            .slice(offset, INFO_HALF_BITS)
            .ok_or(PduParseErr::BufferEnded { field: Some("info") })?;
        info.copy_bits(&mut half, INFO_HALF_BITS);
    }
    info.seek(0);
    Ok(info)
}

/// Rate 1 data: all of info half 1 and the first 94 bits of info half 2
fn rate1_bits(info: &BitBuffer) -> Result<BitBuffer, PduParseErr> {
    info.slice(0, RATE_1_BLOCK_BITS)
        .ok_or(PduParseErr::BufferEnded { field: Some("rate1_data") })
}

pub fn create_data_message(
    slot_type: SlotType,
    pattern: SyncPattern,
    timeslot: Timeslot,
    timestamp: u64,
    frame: &BitBuffer,
) -> Result<DmrMessage, PduParseErr> {
    let info = BurstInfo { pattern, timeslot, timestamp, slot_type };
    let coded = info_bits(frame)?;

    let message = match slot_type.data_type {
        DataType::Csbk => DmrMessage::Csbk(info, Csbk::from_block(bptc::decode_196_96(&coded)?, CRC_MASK_CSBK)?),
        DataType::MbcHeader => {
            DmrMessage::Csbk(info, Csbk::from_block(bptc::decode_196_96(&coded)?, CRC_MASK_MBC_HEADER)?)
        }
        DataType::DataHeader => DmrMessage::DataHeader(info, DataHeader::from_block(bptc::decode_196_96(&coded)?)?),
        DataType::Rate12Data => {
            DmrMessage::DataBlock(info, DataBlock::new(DataRate::Half, bptc::decode_196_96(&coded)?))
        }
        DataType::Rate1Data => DmrMessage::DataBlock(info, DataBlock::new(DataRate::Full, rate1_bits(&coded)?)),
        DataType::Idle => DmrMessage::Idle(info),
        other => DmrMessage::Unsupported(info, other),
    };

    tracing::trace!(t = timestamp, "{} {} -> {}", pattern, slot_type, message);
    Ok(message)
}


#[cfg(test)]
mod tests {
    use dmr_core::edac::bptc::encode_196_96;

    use super::*;
    use crate::enums::csbk_opcode::CsbkOpcode;
    use crate::enums::feature_set_id::FeatureSetId;

    fn frame_with_info(coded: &BitBuffer) -> BitBuffer {
        let mut frame = BitBuffer::new(BURST_BITS);
        frame.seek(INFO1_OFFSET);
        frame.write_bits(coded.peek_bits_startoffset(0, 64).unwrap(), 64);
        frame.write_bits(coded.peek_bits_startoffset(64, 34).unwrap(), 34);
        frame.seek(INFO2_OFFSET);
        frame.write_bits(coded.peek_bits_startoffset(98, 64).unwrap(), 64);
        frame.write_bits(coded.peek_bits_startoffset(162, 34).unwrap(), 34);
        frame
    }

    fn slot_type(data_type: DataType) -> SlotType {
        SlotType { colour_code: 1, data_type, parity: 0 }
    }

    #[test]
    fn test_info_bits_skip_slot_type_and_sync() {
        let mut frame = BitBuffer::new(BURST_BITS);
        frame.seek(INFO1_OFFSET + INFO_HALF_BITS);
        frame.write_bits(u64::MAX, 64);
        let info = info_bits(&frame).unwrap();
        assert_eq!(info.get_len(), INFO_BITS);
        assert!(info.to_bitstr().chars().all(|c| c == '0'));
    }

    #[test]
    fn test_csbk_burst() {
        let csbk = Csbk {
            last_block: true,
            protect: false,
            opcode: CsbkOpcode::Aloha,
            feature_set: FeatureSetId::Standard,
            payload: 0x0123_4567_89AB_CDEF,
            crc: 0,
            corrected_bits: 0,
        };
        let mut block = BitBuffer::new(96);
        csbk.to_bitbuf(&mut block, CRC_MASK_CSBK);
        let frame = frame_with_info(&encode_196_96(&block).unwrap());

        let msg = create_data_message(slot_type(DataType::Csbk), SyncPattern::BaseStationData, 2, 1500, &frame).unwrap();
        assert!(msg.is_valid());
        assert_eq!(msg.timeslot(), 2);
        assert_eq!(msg.timestamp(), 1500);
        match msg {
            DmrMessage::Csbk(_, parsed) => {
                assert_eq!(parsed.opcode, CsbkOpcode::Aloha);
                assert_eq!(parsed.payload, 0x0123_4567_89AB_CDEF);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rate1_block_and_unsupported() {
        let mut coded = BitBuffer::new(INFO_BITS);
        coded.write_bits(0xFFFF, 16);
        let frame = frame_with_info(&coded);

        let msg = create_data_message(slot_type(DataType::Rate1Data), SyncPattern::MobileStationData, 0, 0, &frame).unwrap();
        let DmrMessage::DataBlock(_, block) = msg else { panic!("expected data block") };
        assert_eq!(block.rate, DataRate::Full);
        assert_eq!(block.bits().get_len(), RATE_1_BLOCK_BITS);
        assert_eq!(block.bits().peek_bits_startoffset(0, 17), Some(0x1FFFE));

        let msg = create_data_message(slot_type(DataType::Rate34Data), SyncPattern::MobileStationData, 0, 0, &frame).unwrap();
        assert!(matches!(msg, DmrMessage::Unsupported(_, DataType::Rate34Data)));
    }
}
